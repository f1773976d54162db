// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::fmt;

use thiserror::Error;

use crate::extractors::InvalidReason;

/// Remote calls issued against the ML service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOperation {
    GetModel,
    CreateModel,
    CreateModelHook,
    TrainModel,
    ForecastModel,
    StartModel,
    StopModel,
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteOperation::GetModel => write!(f, "get model"),
            RemoteOperation::CreateModel => write!(f, "create model"),
            RemoteOperation::CreateModelHook => write!(f, "create model hook"),
            RemoteOperation::TrainModel => write!(f, "train model"),
            RemoteOperation::ForecastModel => write!(f, "forecast model"),
            RemoteOperation::StartModel => write!(f, "start model"),
            RemoteOperation::StopModel => write!(f, "stop model"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("query cannot be used to build a model: {0}")]
    InvalidQuery(InvalidReason),

    #[error("could not resolve datasource {datasource}: {message}")]
    Resolution { datasource: String, message: String },

    /// The remote service has no model with this name. Drives the
    /// create-or-retrain decision rather than signalling a failure.
    #[error("model '{0}' not found")]
    ModelNotFound(String),

    #[error("{operation} failed: {message}")]
    Remote {
        operation: RemoteOperation,
        message: String,
    },

    #[error("no model is attached to this panel")]
    NoModel,

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn remote(operation: RemoteOperation, message: impl Into<String>) -> Self {
        Error::Remote {
            operation,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ModelNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_message() {
        let err = Error::remote(RemoteOperation::CreateModelHook, "bucket missing");
        assert_eq!(err.to_string(), "create model hook failed: bucket missing");
    }

    #[test]
    fn test_not_found_is_distinguished() {
        assert!(Error::ModelNotFound("m".into()).is_not_found());
        assert!(!Error::remote(RemoteOperation::GetModel, "boom").is_not_found());
        assert!(!Error::NoModel.is_not_found());
    }
}
