//! Rich diagnostic error types for causeway.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong and how to fix it.
//!
//! Note that an inconsistent solver background is *not* an error: validity checks
//! answer `true` for it by definition, and satisfiability checks answer `false`.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for causeway.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum CausewayError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Input(#[from] InputError),
}

// ---------------------------------------------------------------------------
// Solver errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SolverError {
    #[error("solver returned unknown for {query} query: {reason}")]
    #[diagnostic(
        code(causeway::solver::unknown),
        help(
            "The decision procedure could not decide the query within its limits. \
             Raise `timeout_ms` in the session config, simplify the formula, or set \
             `unknown_policy = \"assume_unsat\"` to accept the permissive fallback."
        )
    )]
    Unknown { query: String, reason: String },

    #[error("sort mismatch while encoding {what}")]
    #[diagnostic(
        code(causeway::solver::sort_mismatch),
        help(
            "A graph accessor produced a term of an unexpected sort. \
             Graph arrays must be built through `Graph::symbolic`, `Graph::empty` \
             or `Graph::from_literal` of the same session."
        )
    )]
    SortMismatch { what: String },
}

// ---------------------------------------------------------------------------
// Structure errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum StructureError {
    #[error("agent not declared in this session: {name}")]
    #[diagnostic(
        code(causeway::structure::unknown_agent),
        help(
            "The session uses the strict name policy. Declare the agent with \
             `session.declare_agent()` or build a graph literal that contains it."
        )
    )]
    UnknownAgent { name: String },

    #[error("label not declared in this session: {label}")]
    #[diagnostic(
        code(causeway::structure::unknown_label),
        help(
            "The session uses the strict name policy. Declare the label with \
             `session.declare_label()` or build a graph literal that carries it."
        )
    )]
    UnknownLabel { label: String },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    #[diagnostic(
        code(causeway::config::read),
        help("Ensure the file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    #[diagnostic(
        code(causeway::config::parse),
        help("Check the TOML syntax of the session config.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write {path}")]
    #[diagnostic(
        code(causeway::config::write),
        help("Ensure you have write permissions to the target directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(causeway::config::invalid),
        help("Check the SessionConfig fields. {message}")
    )]
    Invalid { message: String },
}

// ---------------------------------------------------------------------------
// Input errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum InputError {
    #[error("failed to read input file {path}")]
    #[diagnostic(
        code(causeway::input::read),
        help("Ensure the graph or structure file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse input file {path}: {message}")]
    #[diagnostic(
        code(causeway::input::parse),
        help(
            "Graphs and structures are JSON. A structure looks like \
             {{\"Labeled\": [{{\"Agent\": \"MEK1\"}}, \"phosphate\"]}}."
        )
    )]
    Parse { path: String, message: String },
}

/// Convenience alias for functions returning causeway results.
pub type CausewayResult<T> = std::result::Result<T, CausewayError>;
