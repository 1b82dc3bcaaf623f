//! Component-template dialect for the quokka parsing core.
//!
//! # Scope
//!
//! - Control blocks (`{#if}` / `{:else if}` / `{:else}` / `{/if}`,
//!   `{#each}`, `{#await}` / `{:then}` / `{:catch}`) as one block node
//!   per keyword, content nested beneath the governing branch
//! - Interpolation (`{expr}`) as block nodes
//! - Directive attributes (`on:`, `bind:`, `class:`, ...) marked
//!   non-literal
//! - Component classification by capitalized or dotted names

/// The component-template dialect.
pub mod dialect;

pub use dialect::{TemplateDialect, parse};
