//! Saving and loading fitted pipelines.
//!
//! A fitted pipeline is flattened into a [`PipelineSnapshot`]: per stage, the
//! name, a stable kind identifier and the bincode-encoded learned parameters.
//! Loading rebuilds each stage from its kind identifier and restores the
//! parameters, yielding a pipeline that predicts without refitting.

use crate::backend::Backend;
use crate::model::LinearRegressor;
use crate::pipeline::composition::{validate_stage_names, NamedTerminal, NamedTransform, Pipeline};
use crate::pipeline::error::PipelineError;
use crate::pipeline::stage::{TerminalStage, TransformStage};
use crate::preprocessing::{MinMaxScaler, SimpleImputer, StandardScaler};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Serialize, Deserialize)]
struct PipelineSnapshot {
    n_features_in: usize,
    /// (name, kind, serialized params) per transform stage, in order.
    stages: Vec<(String, String, Vec<u8>)>,
    terminal: (String, String, Vec<u8>),
}

fn transform_stage_from_kind<B: Backend>(
    kind: &str,
) -> Result<Box<dyn TransformStage<B>>, PipelineError> {
    match kind {
        "StandardScaler" => Ok(Box::new(StandardScaler::new())),
        "MinMaxScaler" => Ok(Box::new(MinMaxScaler::new())),
        "SimpleImputer" => Ok(Box::new(SimpleImputer::new())),
        other => Err(PipelineError::Serialization(format!(
            "unknown transform stage kind '{other}'"
        ))),
    }
}

fn terminal_stage_from_kind<B: Backend>(
    kind: &str,
) -> Result<Box<dyn TerminalStage<B>>, PipelineError> {
    match kind {
        "LinearRegressor" => Ok(Box::new(LinearRegressor::new())),
        other => Err(PipelineError::Serialization(format!(
            "unknown terminal stage kind '{other}'"
        ))),
    }
}

impl<B: Backend> Pipeline<B> {
    /// Save the fitted pipeline to a file.
    ///
    /// # Errors
    /// [`PipelineError::NotFitted`] if the pipeline has not been fitted;
    /// I/O and serialization errors otherwise.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), PipelineError> {
        if !self.fitted {
            return Err(PipelineError::NotFitted(
                "call fit before saving".to_string(),
            ));
        }

        let mut stages = Vec::with_capacity(self.stages.len());
        for named in &self.stages {
            stages.push((
                named.name.clone(),
                named.stage.kind().to_string(),
                named.stage.params_to_bytes()?,
            ));
        }
        let snapshot = PipelineSnapshot {
            n_features_in: self.n_features_in,
            stages,
            terminal: (
                self.terminal.name.clone(),
                self.terminal.stage.kind().to_string(),
                self.terminal.stage.params_to_bytes()?,
            ),
        };

        let bytes = bincode::serialize(&snapshot)?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a fitted pipeline from a file written by
    /// [`Pipeline::save_to_file`].
    ///
    /// # Errors
    /// I/O errors, corrupt snapshots, and unknown stage kinds all surface as
    /// [`PipelineError`].
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let bytes = fs::read(path)?;
        let snapshot: PipelineSnapshot = bincode::deserialize(&bytes)?;

        // A snapshot is untrusted input; hold it to the same name rules as
        // the builder.
        validate_stage_names(
            snapshot
                .stages
                .iter()
                .map(|(name, _, _)| name.as_str())
                .chain(std::iter::once(snapshot.terminal.0.as_str())),
        )?;

        let mut stages = Vec::with_capacity(snapshot.stages.len());
        for (name, kind, params) in &snapshot.stages {
            let mut stage = transform_stage_from_kind::<B>(kind)?;
            stage.params_from_bytes(params)?;
            stages.push(NamedTransform {
                name: name.clone(),
                stage,
            });
        }

        let (terminal_name, terminal_kind, terminal_params) = &snapshot.terminal;
        let mut terminal_stage = terminal_stage_from_kind::<B>(terminal_kind)?;
        terminal_stage.params_from_bytes(terminal_params)?;

        Ok(Pipeline {
            stages,
            terminal: NamedTerminal {
                name: terminal_name.clone(),
                stage: terminal_stage,
            },
            n_features_in: snapshot.n_features_in,
            fitted: true,
        })
    }
}
