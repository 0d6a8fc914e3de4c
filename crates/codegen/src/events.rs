//! Generation event macros.
//!
//! Events are plain `tracing` records under the `infragraph::codegen` target,
//! each carrying an `event_type` field so subscribers can filter or render
//! them without parsing messages.
//!
//! # Usage
//!
//! ```rust,ignore
//! use infragraph_codegen::emit_generation_started;
//!
//! emit_generation_started!(12_usize, 9_usize);
//! ```

/// A generation run started.
#[macro_export]
macro_rules! emit_generation_started {
    ($nodes:expr, $edges:expr) => {
        ::tracing::info!(
            target: "infragraph::codegen",
            event_type = "generation.started",
            nodes = $nodes,
            edges = $edges,
            "Generating Terraform configuration"
        )
    };
}

/// A declaration block was produced.
#[macro_export]
macro_rules! emit_generation_block {
    ($declaration_type:expr, $name:expr) => {
        ::tracing::debug!(
            target: "infragraph::codegen",
            event_type = "generation.block",
            declaration_type = %$declaration_type,
            name = %$name,
        )
    };
}

/// Something was skipped or needs attention; `event_type` follows the warning kind.
#[macro_export]
macro_rules! emit_generation_warning {
    ($warning:expr) => {
        ::tracing::warn!(
            target: "infragraph::codegen",
            event_type = $warning.kind.event_type(),
            node_id = ?$warning.node_id,
            kind = %$warning.kind,
            "{}",
            $warning.message
        )
    };
}

/// A generation run finished.
#[macro_export]
macro_rules! emit_generation_completed {
    ($blocks:expr, $warnings:expr) => {
        ::tracing::info!(
            target: "infragraph::codegen",
            event_type = "generation.completed",
            blocks = $blocks,
            warnings = $warnings,
            "Generation complete"
        )
    };
}
