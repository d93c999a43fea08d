//! Cross-module scenarios for the build and query phases.

mod pipeline;
