

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::collaborators::{wait_for_questions, FieldFiller, FormInspector, ReviewAnnotator};
use super::readiness::{wait_until_ready, AlwaysReady, Readiness};
use super::report::{FillReport, OutcomeStatus, QuestionOutcome};
use crate::core::config::SmartfillConfig;
use crate::core::error::{Result, SmartfillError};
use crate::core::settings::Settings;
use crate::resolver::{MatchResult, Profile, Resolver};
use crate::store::{LearnedPairs, LearnedPool, LearningSink};
use crate::utils::{now_millis, safe_truncate_ellipsis};
use crate::LOG_SNIPPET_CHARS;


/// Runs the per-question resolve-and-act loop.
///
/// Questions are handled one at a time in document order. The learned pool is re-read for
/// every question, so a pair learned early in a run is a candidate for later questions.
/// The engine keeps no state between runs.
pub struct FillEngine {
    resolver: Resolver,
    learned: Arc<dyn LearnedPairs>,
    sink: Arc<dyn LearningSink>,
    readiness: Arc<dyn Readiness>,
    ready_timeout: Duration,
    question_wait: Duration,
    question_poll: Duration,
}

impl FillEngine {
    pub fn new(resolver: Resolver, pool: LearnedPool) -> Self {
        let pool = Arc::new(pool);
        let defaults = SmartfillConfig::default();
        Self {
            resolver,
            learned: pool.clone(),
            sink: pool,
            readiness: Arc::new(AlwaysReady),
            ready_timeout: defaults.ready_timeout(),
            question_wait: defaults.question_wait(),
            question_poll: defaults.question_poll(),
        }
    }


    pub fn with_config(mut self, config: &SmartfillConfig) -> Self {
        self.ready_timeout = config.ready_timeout();
        self.question_wait = config.question_wait();
        self.question_poll = config.question_poll();
        self
    }


    pub fn with_timeouts(mut self, ready_timeout: Duration, question_wait: Duration, question_poll: Duration) -> Self {
        self.ready_timeout = ready_timeout;
        self.question_wait = question_wait;
        self.question_poll = question_poll;
        self
    }


    pub fn with_readiness(mut self, readiness: Arc<dyn Readiness>) -> Self {
        self.readiness = readiness;
        self
    }


    pub fn with_sink(mut self, sink: Arc<dyn LearningSink>) -> Self {
        self.sink = sink;
        self
    }


    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }


    /// Only a readiness timeout or invalid settings abort the run; everything else is
    /// confined to the question it happened on.
    pub async fn run_fill<I, F, A>(
        &self,
        inspector: &I,
        filler: &F,
        annotator: &A,
        profile: &Profile,
        settings: &Settings,
    ) -> Result<FillReport>
    where
        I: FormInspector + ?Sized,
        F: FieldFiller<I::Handle> + ?Sized,
        A: ReviewAnnotator<I::Handle> + ?Sized,
    {
        settings.validate()?;
        let mut report = FillReport::new(settings.review_mode);
        info!(
            "Fill {} started: review={}, learning={}, threshold={:.2}, profile fields={}",
            report.run_id,
            settings.review_mode,
            settings.learning_enabled,
            settings.threshold,
            profile.len()
        );

        wait_until_ready(self.readiness.as_ref(), self.ready_timeout).await?;

        let questions = wait_for_questions(inspector, self.question_wait, self.question_poll).await;
        report.questions_found = questions.len();
        info!("Detected {} question nodes", questions.len());

        if questions.is_empty() {
            warn!("{}", SmartfillError::NoQuestionsFound(self.question_wait));
            return Ok(report);
        }

        if !settings.review_mode {
            if let Err(e) = annotator.clear_annotations().await {
                warn!("Could not clear earlier suggestions: {}", e);
            }
        }

        for (position, handle) in questions.iter().enumerate() {
            let label = inspector.question_label(handle).trim().to_string();
            let outcome = self
                .handle_question(position, label, handle, filler, annotator, profile, settings)
                .await;
            report.outcomes.push(outcome);
        }

        info!(
            "Fill {} finished: {} filled, {} suggested, {} unresolved, {} learned",
            report.run_id,
            report.filled(),
            report.suggested(),
            report.unresolved(),
            report.learned()
        );

        Ok(report)
    }


    #[allow(clippy::too_many_arguments)]
    async fn handle_question<H, F, A>(
        &self,
        position: usize,
        label: String,
        handle: &H,
        filler: &F,
        annotator: &A,
        profile: &Profile,
        settings: &Settings,
    ) -> QuestionOutcome
    where
        H: Send + Sync,
        F: FieldFiller<H> + ?Sized,
        A: ReviewAnnotator<H> + ?Sized,
    {
        let mut outcome = QuestionOutcome {
            position,
            label,
            status: OutcomeStatus::Unresolved,
            matched: None,
            learned: false,
            error: None,
        };

        if outcome.label.is_empty() {
            outcome.status = OutcomeStatus::SkippedBlank;
            return outcome;
        }

        let snippet = safe_truncate_ellipsis(&outcome.label, LOG_SNIPPET_CHARS);
        let learned = match self.learned.pairs().await {
            Ok(pairs) => pairs,
            Err(e) => {
                warn!("Learned pairs unavailable for '{}': {}", snippet, e);
                Vec::new()
            }
        };

        let Some(matched) = self
            .resolver
            .resolve(&outcome.label, &learned, profile, settings.threshold)
        else {
            debug!("Leaving '{}' unresolved", snippet);
            return outcome;
        };

        if settings.review_mode {
            match annotator.annotate(handle, &matched.value).await {
                Ok(()) => outcome.status = OutcomeStatus::Suggested,
                Err(e) => fail(&mut outcome, &snippet, e),
            }
        } else {
            match filler.apply_answer(handle, &matched.value).await {
                Ok(()) => {
                    outcome.status = OutcomeStatus::Filled;
                    if settings.should_learn() {
                        outcome.learned = self.learn(&outcome.label, &matched).await;
                    }
                }
                Err(e) => fail(&mut outcome, &snippet, e),
            }
        }

        outcome.matched = Some(matched);
        outcome
    }


    async fn learn(&self, question: &str, matched: &MatchResult) -> bool {
        if question.is_empty() || matched.value.is_empty() {
            return false;
        }
        match self.sink.append(question, &matched.value, now_millis()).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not record learned pair: {}", e);
                false
            }
        }
    }
}

fn fail(outcome: &mut QuestionOutcome, snippet: &str, error: SmartfillError) {
    warn!("Question '{}' failed: {}", snippet, error);
    outcome.status = OutcomeStatus::Failed;
    outcome.error = Some(error.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fill::{ReadyFlag, TextForm};
    use crate::resolver::MatchSource;
    use crate::store::MemoryStore;
    use async_trait::async_trait;

    fn engine_with_pool() -> (FillEngine, LearnedPool) {
        let pool = LearnedPool::new(Arc::new(MemoryStore::new()));
        let engine = FillEngine::new(Resolver::default(), pool.clone()).with_timeouts(
            Duration::from_millis(50),
            Duration::from_millis(50),
            Duration::from_millis(5),
        );
        (engine, pool)
    }

    fn jane() -> Profile {
        Profile::new()
            .with("name", "Jane Doe")
            .with("email", "jane@doe.com")
            .with("phone", "555-0100")
    }

    async fn run(engine: &FillEngine, form: &TextForm, settings: Settings) -> FillReport {
        engine.run_fill(form, form, form, &jane(), &settings).await.unwrap()
    }

    struct FailingSink;

    #[async_trait]
    impl LearningSink for FailingSink {
        async fn append(&self, _question: &str, _answer: &str, _timestamp: i64) -> Result<()> {
            Err(SmartfillError::Storage("disk full".to_string()))
        }
    }

    #[tokio::test]
    async fn test_fills_matching_questions_in_order() {
        let (engine, _) = engine_with_pool();
        let form = TextForm::new(["Your full legal name", "Favorite color", "Email"]);
        let report = run(&engine, &form, Settings::default()).await;

        assert_eq!(report.questions_found, 3);
        assert_eq!(form.applied(), vec![(0, "Jane Doe".to_string()), (2, "jane@doe.com".to_string())]);
        assert_eq!(report.filled(), 2);
        assert_eq!(report.unresolved(), 1);
        assert_eq!(report.outcome(1).unwrap().status, OutcomeStatus::Unresolved);
    }

    #[tokio::test]
    async fn test_review_mode_annotates_instead_of_filling() {
        let (engine, pool) = engine_with_pool();
        let form = TextForm::new(["Email"]);
        let settings = Settings {
            review_mode: true,
            learning_enabled: true,
            ..Default::default()
        };
        let report = run(&engine, &form, settings).await;

        assert!(form.applied().is_empty());
        assert_eq!(form.annotations().get(&0).map(String::as_str), Some("jane@doe.com"));
        assert_eq!(report.suggested(), 1);
        assert!(pool.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_review_run_clears_old_annotations() {
        let (engine, _) = engine_with_pool();
        let form = TextForm::new(["Email"]);
        let review = Settings {
            review_mode: true,
            ..Default::default()
        };
        run(&engine, &form, review).await;
        assert_eq!(form.annotations().len(), 1);

        run(&engine, &form, Settings::default()).await;
        assert!(form.annotations().is_empty());
        assert_eq!(form.applied_value(0).as_deref(), Some("jane@doe.com"));
    }

    #[tokio::test]
    async fn test_learning_appends_and_feeds_later_questions() {
        let (engine, pool) = engine_with_pool();
        let form = TextForm::new(["Email", "Email"]);
        let settings = Settings {
            learning_enabled: true,
            ..Default::default()
        };
        let report = run(&engine, &form, settings).await;

        assert_eq!(report.learned(), 2);
        let pairs = pool.load().await.unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].question, "Email");
        assert_eq!(
            report.outcome(0).unwrap().matched.as_ref().unwrap().source,
            MatchSource::Profile
        );
        assert_eq!(
            report.outcome(1).unwrap().matched.as_ref().unwrap().source,
            MatchSource::LearnedMemory
        );
    }

    #[tokio::test]
    async fn test_learned_answer_overrides_profile() {
        let (engine, pool) = engine_with_pool();
        pool.append("Email", "work@acme.com", 1).await.unwrap();
        let form = TextForm::new(["Email"]);
        run(&engine, &form, Settings::default()).await;
        assert_eq!(form.applied_value(0).as_deref(), Some("work@acme.com"));
    }

    #[tokio::test]
    async fn test_empty_learned_answer_uses_profile() {
        let (engine, pool) = engine_with_pool();
        pool.import_json(r#"[{"q": "Email", "a": "", "ts": 1}]"#).await.unwrap();
        let form = TextForm::new(["Email"]);
        let report = run(&engine, &form, Settings::default()).await;

        assert_eq!(form.applied(), vec![(0, "jane@doe.com".to_string())]);
        let outcome = report.outcome(0).unwrap();
        assert_eq!(outcome.status, OutcomeStatus::Filled);
        assert_eq!(outcome.matched.as_ref().unwrap().source, MatchSource::Profile);
    }

    #[tokio::test]
    async fn test_empty_profile_value_left_unresolved() {
        let (engine, pool) = engine_with_pool();
        let form = TextForm::new(["Phone"]);
        let settings = Settings {
            learning_enabled: true,
            ..Default::default()
        };
        let report = engine
            .run_fill(&form, &form, &form, &Profile::new().with("phone", ""), &settings)
            .await
            .unwrap();

        assert!(form.applied().is_empty());
        assert_eq!(report.outcome(0).unwrap().status, OutcomeStatus::Unresolved);
        assert!(pool.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_learning_disabled_records_nothing() {
        let (engine, pool) = engine_with_pool();
        let form = TextForm::new(["Email"]);
        run(&engine, &form, Settings::default()).await;
        assert!(pool.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_labels_skipped() {
        let (engine, _) = engine_with_pool();
        let form = TextForm::new(["   ", "Email"]);
        let report = run(&engine, &form, Settings::default()).await;
        assert_eq!(report.outcome(0).unwrap().status, OutcomeStatus::SkippedBlank);
        assert_eq!(report.filled(), 1);
    }

    #[tokio::test]
    async fn test_no_questions_is_not_fatal() {
        let (engine, _) = engine_with_pool();
        let form = TextForm::new(Vec::<String>::new());
        let report = run(&engine, &form, Settings::default()).await;
        assert_eq!(report.questions_found, 0);
        assert!(report.outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_waits_for_late_questions() {
        let (engine, _) = engine_with_pool();
        let engine = engine.with_timeouts(
            Duration::from_millis(50),
            Duration::from_secs(2),
            Duration::from_millis(5),
        );
        let form = TextForm::new(["Email"]).appearing_after(Duration::from_millis(30));
        let report = run(&engine, &form, Settings::default()).await;
        assert_eq!(report.filled(), 1);
    }

    #[tokio::test]
    async fn test_readiness_timeout_aborts() {
        let (engine, _) = engine_with_pool();
        let engine = engine.with_readiness(Arc::new(ReadyFlag::new()));
        let form = TextForm::new(["Email"]);
        let err = engine
            .run_fill(&form, &form, &form, &jane(), &Settings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SmartfillError::InitializationTimeout(_)));
        assert!(form.applied().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_threshold_rejected() {
        let (engine, _) = engine_with_pool();
        let form = TextForm::new(["Email"]);
        let result = engine
            .run_fill(&form, &form, &form, &jane(), &Settings::with_threshold(1.5))
            .await;
        assert!(matches!(result, Err(SmartfillError::Validation(_))));
    }

    #[tokio::test]
    async fn test_fill_failure_confined_to_question() {
        let (engine, pool) = engine_with_pool();
        let form = TextForm::new(["Your full legal name", "Email"]).failing_at(0);
        let settings = Settings {
            learning_enabled: true,
            ..Default::default()
        };
        let report = run(&engine, &form, settings).await;

        assert_eq!(report.outcome(0).unwrap().status, OutcomeStatus::Failed);
        assert!(report.outcome(0).unwrap().error.is_some());
        assert_eq!(report.filled(), 1);
        assert_eq!(pool.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sink_failure_does_not_stop_fill() {
        let (engine, _) = engine_with_pool();
        let engine = engine.with_sink(Arc::new(FailingSink));
        let form = TextForm::new(["Email", "Phone"]);
        let settings = Settings {
            learning_enabled: true,
            ..Default::default()
        };
        let report = run(&engine, &form, settings).await;
        assert_eq!(report.filled(), 2);
        assert_eq!(report.learned(), 0);
    }

    #[tokio::test]
    async fn test_repeat_runs_are_independent() {
        let (engine, _) = engine_with_pool();
        let form = TextForm::new(["Email"]);
        let first = run(&engine, &form, Settings::default()).await;
        let second = run(&engine, &form, Settings::default()).await;
        assert_eq!(first.filled(), second.filled());
        assert_ne!(first.run_id, second.run_id);
    }
}
