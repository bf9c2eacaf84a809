// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Semantic validation errors for parsed shell ASTs.

use crate::span::Span;
use thiserror::Error;

/// A semantic problem found in an otherwise syntactically valid AST.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("nesting depth {depth} exceeds maximum of {max}")]
    ExcessiveNesting {
        depth: usize,
        max: usize,
        span: Span,
    },

    #[error("IFS configuration is not supported; word splitting uses default whitespace rules")]
    IfsAssignment { span: Span },

    #[error(
        "standalone assignment '{name}={}' has no effect without a command",
        value.as_deref().unwrap_or("")
    )]
    StandaloneAssignment {
        name: String,
        value: Option<String>,
        span: Span,
    },

    #[error("empty pipeline segment")]
    EmptyPipelineSegment { span: Span },

    #[error("empty subshell")]
    EmptySubshell { span: Span },

    #[error("empty brace group")]
    EmptyBraceGroup { span: Span },
}

impl ValidationError {
    /// The span this error applies to, for diagnostic rendering.
    pub fn span(&self) -> Span {
        match self {
            ValidationError::ExcessiveNesting { span, .. }
            | ValidationError::IfsAssignment { span }
            | ValidationError::StandaloneAssignment { span, .. }
            | ValidationError::EmptyPipelineSegment { span }
            | ValidationError::EmptySubshell { span }
            | ValidationError::EmptyBraceGroup { span } => *span,
        }
    }

    /// Generate a rich diagnostic with line/column info.
    pub fn diagnostic(&self, input: &str) -> String {
        crate::span::diagnostic_context(input, self.span(), &self.to_string())
    }
}
