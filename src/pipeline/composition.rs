//! The pipeline itself: an ordered list of named transform stages plus a
//! terminal stage.
//!
//! Execution order is declaration order. Fitting runs fit-then-transform
//! through every transform stage, feeding each stage's output to the next,
//! and finally fits the terminal stage on the fully transformed features and
//! the original labels. Prediction replays the already-fitted transforms and
//! invokes the terminal stage's predict.
//!
//! A pipeline is single-threaded by design: `fit` takes `&mut self`, so
//! concurrent fitting of one instance is rejected by the borrow checker.

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::pipeline::error::PipelineError;
use crate::pipeline::stage::{TerminalStage, TransformStage};
use log::debug;
use std::collections::HashSet;

pub(crate) struct NamedTransform<B: Backend> {
    pub(crate) name: String,
    pub(crate) stage: Box<dyn TransformStage<B>>,
}

pub(crate) struct NamedTerminal<B: Backend> {
    pub(crate) name: String,
    pub(crate) stage: Box<dyn TerminalStage<B>>,
}

/// Builder for [`Pipeline`].
///
/// Stages execute in the order they are added. Names must be unique across
/// the whole pipeline, terminal included; [`PipelineBuilder::build`] rejects
/// duplicates before any data is touched.
pub struct PipelineBuilder<B: Backend> {
    stages: Vec<NamedTransform<B>>,
    terminal: Option<NamedTerminal<B>>,
}

impl<B: Backend> Default for PipelineBuilder<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> PipelineBuilder<B> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            terminal: None,
        }
    }

    /// Append a named transform stage.
    pub fn stage(mut self, name: impl Into<String>, stage: impl TransformStage<B> + 'static) -> Self {
        self.stages.push(NamedTransform {
            name: name.into(),
            stage: Box::new(stage),
        });
        self
    }

    /// Set the named terminal stage, replacing any previously configured one.
    pub fn terminal(
        mut self,
        name: impl Into<String>,
        stage: impl TerminalStage<B> + 'static,
    ) -> Self {
        self.terminal = Some(NamedTerminal {
            name: name.into(),
            stage: Box::new(stage),
        });
        self
    }

    /// Validate the configuration and produce an unfitted [`Pipeline`].
    ///
    /// # Errors
    /// - [`PipelineError::MissingTerminal`] if no terminal stage was set.
    /// - [`PipelineError::DuplicateStageName`] if two stages share a name.
    /// - [`PipelineError::InvalidParameter`] for an empty stage name.
    pub fn build(self) -> Result<Pipeline<B>, PipelineError> {
        let terminal = self.terminal.ok_or(PipelineError::MissingTerminal)?;

        validate_stage_names(
            self.stages
                .iter()
                .map(|s| s.name.as_str())
                .chain(std::iter::once(terminal.name.as_str())),
        )?;

        Ok(Pipeline {
            stages: self.stages,
            terminal,
            n_features_in: 0,
            fitted: false,
        })
    }
}

/// Checks that every stage name, terminal included, is non-empty and unique.
///
/// Both construction paths go through here: [`PipelineBuilder::build`] and
/// loading a persisted pipeline.
pub(crate) fn validate_stage_names<'a>(
    names: impl IntoIterator<Item = &'a str>,
) -> Result<(), PipelineError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.is_empty() {
            return Err(PipelineError::InvalidParameter(
                "stage names must be non-empty".to_string(),
            ));
        }
        if !seen.insert(name) {
            return Err(PipelineError::DuplicateStageName(name.to_string()));
        }
    }
    Ok(())
}

/// A sequential composition of named transform stages and a terminal stage.
///
/// Lifecycle: construct via [`Pipeline::builder`] (unfitted), [`fit`]
/// (mutates every stage's state in place and marks the pipeline fitted),
/// then [`predict`] / [`transform`] any number of times.
///
/// Any stage failure aborts the current call and propagates to the caller
/// unchanged; a failed `fit` leaves the pipeline unfitted.
///
/// [`fit`]: Pipeline::fit
/// [`predict`]: Pipeline::predict
/// [`transform`]: Pipeline::transform
pub struct Pipeline<B: Backend> {
    pub(crate) stages: Vec<NamedTransform<B>>,
    pub(crate) terminal: NamedTerminal<B>,
    pub(crate) n_features_in: usize,
    pub(crate) fitted: bool,
}

impl<B: Backend> Pipeline<B> {
    /// Start building a pipeline.
    pub fn builder() -> PipelineBuilder<B> {
        PipelineBuilder::new()
    }

    /// Fit every stage in declared order.
    ///
    /// For each transform stage: fit on the current features (and labels, if
    /// provided), then transform those features to produce the input of the
    /// next stage. The terminal stage is fitted last, on the fully
    /// transformed features and the original labels.
    ///
    /// Returns `&mut Self` so further calls can be chained.
    ///
    /// # Errors
    /// - [`PipelineError::EmptyData`] for zero input rows.
    /// - [`PipelineError::ShapeMismatch`] if `labels` length differs from the
    ///   number of rows.
    /// - Any error raised by a stage, verbatim. The pipeline is left unfitted
    ///   in that case.
    pub fn fit(
        &mut self,
        features: &Tensor2D<B>,
        labels: Option<&Tensor1D<B>>,
    ) -> Result<&mut Self, PipelineError> {
        let (rows, cols) = features.shape();
        if rows == 0 {
            return Err(PipelineError::EmptyData(
                "cannot fit pipeline on zero samples".to_string(),
            ));
        }
        if let Some(y) = labels {
            if y.len() != rows {
                return Err(PipelineError::ShapeMismatch {
                    expected: format!("{rows} labels"),
                    got: y.len().to_string(),
                });
            }
        }

        // A refit that fails midway must not leave the pipeline usable.
        self.fitted = false;

        let mut current = features.clone();
        for named in &mut self.stages {
            debug!("fitting stage '{}' ({})", named.name, named.stage.kind());
            named.stage.fit(&current, labels)?;
            current = named.stage.transform(&current)?;
        }
        debug!(
            "fitting terminal stage '{}' ({})",
            self.terminal.name,
            self.terminal.stage.kind()
        );
        self.terminal.stage.fit(&current, labels)?;

        self.n_features_in = cols;
        self.fitted = true;
        Ok(self)
    }

    /// Apply every transform stage's already-fitted transform, in order.
    ///
    /// # Errors
    /// [`PipelineError::NotFitted`] before a successful fit;
    /// [`PipelineError::FeatureMismatch`] on a column count mismatch.
    pub fn transform(&self, features: &Tensor2D<B>) -> Result<Tensor2D<B>, PipelineError> {
        self.require_fitted("transform")?;
        self.check_features(features)?;

        let mut current = features.clone();
        for named in &self.stages {
            debug!(
                "transforming through stage '{}' ({})",
                named.name,
                named.stage.kind()
            );
            current = named.stage.transform(&current)?;
        }
        Ok(current)
    }

    /// Transform features through every non-terminal stage and predict with
    /// the terminal stage.
    ///
    /// Uses each stage's fitted state from the last `fit` call; nothing is
    /// re-fitted, so repeated calls with the same input yield identical
    /// output.
    ///
    /// # Errors
    /// [`PipelineError::NotFitted`] before a successful fit;
    /// [`PipelineError::FeatureMismatch`] on a column count mismatch; any
    /// stage error, verbatim.
    pub fn predict(&self, features: &Tensor2D<B>) -> Result<Tensor1D<B>, PipelineError> {
        self.require_fitted("predict")?;
        self.check_features(features)?;

        let mut current = features.clone();
        for named in &self.stages {
            debug!(
                "transforming through stage '{}' ({})",
                named.name,
                named.stage.kind()
            );
            current = named.stage.transform(&current)?;
        }
        debug!(
            "predicting with terminal stage '{}' ({})",
            self.terminal.name,
            self.terminal.stage.kind()
        );
        self.terminal.stage.predict(&current)
    }

    /// Whether the pipeline has been successfully fitted.
    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    /// Total number of stages, terminal included.
    pub fn n_stages(&self) -> usize {
        self.stages.len() + 1
    }

    /// Stage names in execution order, terminal last.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages
            .iter()
            .map(|s| s.name.as_str())
            .chain(std::iter::once(self.terminal.name.as_str()))
            .collect()
    }

    /// Number of input features seen during fit, or `None` if unfitted.
    pub fn n_features_in(&self) -> Option<usize> {
        self.fitted.then_some(self.n_features_in)
    }

    /// JSON summary of the pipeline: stage names, kinds and fitted status.
    pub fn describe(&self) -> serde_json::Value {
        serde_json::json!({
            "fitted": self.fitted,
            "stages": self.stages.iter().map(|s| {
                serde_json::json!({ "name": s.name, "kind": s.stage.kind() })
            }).collect::<Vec<_>>(),
            "terminal": {
                "name": self.terminal.name,
                "kind": self.terminal.stage.kind(),
            },
        })
    }

    fn require_fitted(&self, operation: &str) -> Result<(), PipelineError> {
        if self.fitted {
            Ok(())
        } else {
            Err(PipelineError::NotFitted(format!(
                "call fit before {operation}"
            )))
        }
    }

    fn check_features(&self, features: &Tensor2D<B>) -> Result<(), PipelineError> {
        let (_, cols) = features.shape();
        if cols != self.n_features_in {
            return Err(PipelineError::FeatureMismatch {
                expected: self.n_features_in,
                got: cols,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;
    use crate::model::LinearRegressor;
    use crate::preprocessing::{MinMaxScaler, StandardScaler};
    use std::cell::RefCell;
    use std::rc::Rc;

    type B = CpuBackend;

    fn train_data() -> (Tensor2D<B>, Tensor1D<B>) {
        let x = Tensor2D::from_rows(&[vec![1.0], vec![2.0], vec![3.0]]);
        let y = Tensor1D::new(vec![1.0, 2.0, 3.0]);
        (x, y)
    }

    /// Transform stage that records fit/transform invocations into a shared
    /// log and passes features through unchanged.
    struct ProbeTransform {
        tag: &'static str,
        log: Rc<RefCell<Vec<String>>>,
        fitted: bool,
    }

    impl TransformStage<B> for ProbeTransform {
        fn fit(
            &mut self,
            _features: &Tensor2D<B>,
            _labels: Option<&Tensor1D<B>>,
        ) -> Result<(), PipelineError> {
            self.log.borrow_mut().push(format!("fit:{}", self.tag));
            self.fitted = true;
            Ok(())
        }

        fn transform(&self, features: &Tensor2D<B>) -> Result<Tensor2D<B>, PipelineError> {
            self.log
                .borrow_mut()
                .push(format!("transform:{}", self.tag));
            Ok(features.clone())
        }

        fn is_fitted(&self) -> bool {
            self.fitted
        }

        fn kind(&self) -> &'static str {
            "ProbeTransform"
        }

        fn params_to_bytes(&self) -> Result<Vec<u8>, PipelineError> {
            Ok(Vec::new())
        }

        fn params_from_bytes(&mut self, _bytes: &[u8]) -> Result<(), PipelineError> {
            self.fitted = true;
            Ok(())
        }
    }

    /// Terminal stage that records its fit invocation and predicts zeros.
    struct ProbeTerminal {
        log: Rc<RefCell<Vec<String>>>,
        fitted: bool,
    }

    impl TerminalStage<B> for ProbeTerminal {
        fn fit(
            &mut self,
            _features: &Tensor2D<B>,
            _labels: Option<&Tensor1D<B>>,
        ) -> Result<(), PipelineError> {
            self.log.borrow_mut().push("fit:terminal".to_string());
            self.fitted = true;
            Ok(())
        }

        fn predict(&self, features: &Tensor2D<B>) -> Result<Tensor1D<B>, PipelineError> {
            let (rows, _) = features.shape();
            Ok(Tensor1D::zeros(rows))
        }

        fn is_fitted(&self) -> bool {
            self.fitted
        }

        fn kind(&self) -> &'static str {
            "ProbeTerminal"
        }

        fn params_to_bytes(&self) -> Result<Vec<u8>, PipelineError> {
            Ok(Vec::new())
        }

        fn params_from_bytes(&mut self, _bytes: &[u8]) -> Result<(), PipelineError> {
            self.fitted = true;
            Ok(())
        }
    }

    /// Transform stage that always fails to fit.
    struct FailingTransform;

    impl TransformStage<B> for FailingTransform {
        fn fit(
            &mut self,
            _features: &Tensor2D<B>,
            _labels: Option<&Tensor1D<B>>,
        ) -> Result<(), PipelineError> {
            Err(PipelineError::InvalidParameter("boom".to_string()))
        }

        fn transform(&self, features: &Tensor2D<B>) -> Result<Tensor2D<B>, PipelineError> {
            Ok(features.clone())
        }

        fn is_fitted(&self) -> bool {
            false
        }

        fn kind(&self) -> &'static str {
            "FailingTransform"
        }

        fn params_to_bytes(&self) -> Result<Vec<u8>, PipelineError> {
            Err(PipelineError::NotFitted("unfitted probe".to_string()))
        }

        fn params_from_bytes(&mut self, _bytes: &[u8]) -> Result<(), PipelineError> {
            Ok(())
        }
    }

    #[test]
    fn test_duplicate_stage_names_rejected_at_build() {
        let result = Pipeline::<B>::builder()
            .stage("x", StandardScaler::new())
            .stage("x", MinMaxScaler::new())
            .terminal("model", LinearRegressor::new())
            .build();

        assert!(matches!(
            result,
            Err(PipelineError::DuplicateStageName(name)) if name == "x"
        ));
    }

    #[test]
    fn test_terminal_name_collides_with_stage_name() {
        let result = Pipeline::<B>::builder()
            .stage("x", StandardScaler::new())
            .terminal("x", LinearRegressor::new())
            .build();

        assert!(matches!(
            result,
            Err(PipelineError::DuplicateStageName(_))
        ));
    }

    #[test]
    fn test_missing_terminal_rejected_at_build() {
        let result = Pipeline::<B>::builder()
            .stage("scale", StandardScaler::new())
            .build();

        assert!(matches!(result, Err(PipelineError::MissingTerminal)));
    }

    #[test]
    fn test_empty_stage_name_rejected() {
        let result = Pipeline::<B>::builder()
            .stage("", StandardScaler::new())
            .terminal("model", LinearRegressor::new())
            .build();

        assert!(matches!(result, Err(PipelineError::InvalidParameter(_))));
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let pipeline = Pipeline::<B>::builder()
            .stage("scale", StandardScaler::new())
            .terminal("model", LinearRegressor::new())
            .build()
            .unwrap();

        let (x, _) = train_data();
        assert!(matches!(
            pipeline.predict(&x),
            Err(PipelineError::NotFitted(_))
        ));
    }

    #[test]
    fn test_transform_before_fit_fails() {
        let pipeline = Pipeline::<B>::builder()
            .stage("scale", StandardScaler::new())
            .terminal("model", LinearRegressor::new())
            .build()
            .unwrap();

        let (x, _) = train_data();
        assert!(matches!(
            pipeline.transform(&x),
            Err(PipelineError::NotFitted(_))
        ));
    }

    #[test]
    fn test_fit_order_each_stage_once_in_declared_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut pipeline = Pipeline::<B>::builder()
            .stage(
                "a",
                ProbeTransform {
                    tag: "a",
                    log: Rc::clone(&log),
                    fitted: false,
                },
            )
            .stage(
                "b",
                ProbeTransform {
                    tag: "b",
                    log: Rc::clone(&log),
                    fitted: false,
                },
            )
            .terminal(
                "end",
                ProbeTerminal {
                    log: Rc::clone(&log),
                    fitted: false,
                },
            )
            .build()
            .unwrap();

        let (x, y) = train_data();
        pipeline.fit(&x, Some(&y)).unwrap();

        assert_eq!(
            log.borrow().as_slice(),
            [
                "fit:a",
                "transform:a",
                "fit:b",
                "transform:b",
                "fit:terminal"
            ]
        );
    }

    #[test]
    fn test_predict_does_not_refit() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut pipeline = Pipeline::<B>::builder()
            .stage(
                "a",
                ProbeTransform {
                    tag: "a",
                    log: Rc::clone(&log),
                    fitted: false,
                },
            )
            .terminal(
                "end",
                ProbeTerminal {
                    log: Rc::clone(&log),
                    fitted: false,
                },
            )
            .build()
            .unwrap();

        let (x, y) = train_data();
        pipeline.fit(&x, Some(&y)).unwrap();
        log.borrow_mut().clear();

        pipeline.predict(&x).unwrap();
        pipeline.predict(&x).unwrap();

        assert!(log.borrow().iter().all(|entry| !entry.starts_with("fit:")));
    }

    #[test]
    fn test_predict_is_idempotent() {
        let (x, y) = train_data();
        let mut pipeline = Pipeline::<B>::builder()
            .stage("scale", StandardScaler::new())
            .terminal("model", LinearRegressor::new())
            .build()
            .unwrap();

        pipeline.fit(&x, Some(&y)).unwrap();

        let probe = Tensor2D::from_rows(&[vec![4.0]]);
        let first = pipeline.predict(&probe).unwrap().to_vec();
        let second = pipeline.predict(&probe).unwrap().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn test_failed_fit_leaves_pipeline_unfitted() {
        let (x, y) = train_data();
        let mut pipeline = Pipeline::<B>::builder()
            .stage("scale", StandardScaler::new())
            .stage("broken", FailingTransform)
            .terminal("model", LinearRegressor::new())
            .build()
            .unwrap();

        assert!(pipeline.fit(&x, Some(&y)).is_err());
        assert!(!pipeline.is_fitted());
        assert!(matches!(
            pipeline.predict(&x),
            Err(PipelineError::NotFitted(_))
        ));
    }

    #[test]
    fn test_fit_empty_data() {
        let mut pipeline = Pipeline::<B>::builder()
            .stage("scale", StandardScaler::new())
            .terminal("model", LinearRegressor::new())
            .build()
            .unwrap();

        let x = Tensor2D::<B>::new(vec![], 0, 1);
        let y = Tensor1D::new(vec![]);
        assert!(matches!(
            pipeline.fit(&x, Some(&y)),
            Err(PipelineError::EmptyData(_))
        ));
    }

    #[test]
    fn test_fit_label_length_mismatch() {
        let mut pipeline = Pipeline::<B>::builder()
            .terminal("model", LinearRegressor::new())
            .build()
            .unwrap();

        let x = Tensor2D::from_rows(&[vec![1.0], vec![2.0]]);
        let y = Tensor1D::new(vec![1.0, 2.0, 3.0]);
        assert!(matches!(
            pipeline.fit(&x, Some(&y)),
            Err(PipelineError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_predict_feature_mismatch() {
        let (x, y) = train_data();
        let mut pipeline = Pipeline::<B>::builder()
            .stage("scale", StandardScaler::new())
            .terminal("model", LinearRegressor::new())
            .build()
            .unwrap();
        pipeline.fit(&x, Some(&y)).unwrap();

        let wrong = Tensor2D::from_rows(&[vec![1.0, 2.0]]);
        assert!(matches!(
            pipeline.predict(&wrong),
            Err(PipelineError::FeatureMismatch {
                expected: 1,
                got: 2
            })
        ));
    }

    #[test]
    fn test_stage_names_and_counts() {
        let pipeline = Pipeline::<B>::builder()
            .stage("impute", StandardScaler::new())
            .stage("scale", MinMaxScaler::new())
            .terminal("model", LinearRegressor::new())
            .build()
            .unwrap();

        assert_eq!(pipeline.n_stages(), 3);
        assert_eq!(pipeline.stage_names(), vec!["impute", "scale", "model"]);
        assert_eq!(pipeline.n_features_in(), None);
    }

    #[test]
    fn test_describe() {
        let (x, y) = train_data();
        let mut pipeline = Pipeline::<B>::builder()
            .stage("scale", StandardScaler::new())
            .terminal("model", LinearRegressor::new())
            .build()
            .unwrap();

        let before = pipeline.describe();
        assert_eq!(before["fitted"], serde_json::json!(false));
        assert_eq!(before["stages"][0]["name"], "scale");
        assert_eq!(before["stages"][0]["kind"], "StandardScaler");
        assert_eq!(before["terminal"]["kind"], "LinearRegressor");

        pipeline.fit(&x, Some(&y)).unwrap();
        assert_eq!(pipeline.describe()["fitted"], serde_json::json!(true));
    }

    #[test]
    fn test_fit_returns_self_for_chaining() {
        let (x, y) = train_data();
        let mut pipeline = Pipeline::<B>::builder()
            .stage("scale", StandardScaler::new())
            .terminal("model", LinearRegressor::new())
            .build()
            .unwrap();

        let predictions = pipeline.fit(&x, Some(&y)).unwrap().predict(&x).unwrap();
        assert_eq!(predictions.len(), 3);
    }
}
