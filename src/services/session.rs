use anyhow::{anyhow, Result};
use log::{error, info, warn};
use rand::Rng;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::Timings;
use crate::error::InsightError;
use crate::models::conversation::ChatEntry;
use crate::models::dataset::Dataset;
use crate::models::response::{ActiveView, SessionSnapshot};
use crate::models::upload::{FileHandle, Phase, UploadState};
use crate::services::chart_builder::build_spec;
use crate::services::conversation::ConversationStore;
use crate::services::query_dispatcher::QueryDispatcher;
use crate::services::upload_simulator::{TickOutcome, UploadSimulator};
use crate::services::{ChartSink, DatasetSource};

/// The single container every chart reply renders into
pub const CHART_CONTAINER: &str = "insight-chart";

pub const REJECTED_FILE_MESSAGE: &str = "Please upload an Excel (.xlsx) file.";

const INITIAL_MEMORY_USAGE: u8 = 25;

/// Everything the shell observes. Only `Session` mutates it.
#[derive(Debug)]
pub struct SessionState {
    pub conversation: ConversationStore,
    pub upload: UploadState,
    pub dataset: Option<Dataset>,
    pub active_view: ActiveView,
    pub is_typing: bool,
    pub memory_usage: u8,
    /// Bumped on every accepted file; stale pipeline work compares against it
    generation: u64,
}

impl SessionState {
    fn new() -> Self {
        Self {
            conversation: ConversationStore::new(),
            upload: UploadState::default(),
            dataset: None,
            active_view: ActiveView::Chat,
            is_typing: false,
            memory_usage: INITIAL_MEMORY_USAGE,
            generation: 0,
        }
    }
}

#[derive(Default)]
struct SessionTasks {
    pipeline: Option<JoinHandle<()>>,
    memory_gauge: Option<JoinHandle<()>>,
    query: Option<JoinHandle<()>>,
}

impl SessionTasks {
    fn abort_upload_work(&mut self) -> bool {
        let mut aborted = false;
        for handle in [self.pipeline.take(), self.memory_gauge.take()].into_iter().flatten() {
            if !handle.is_finished() {
                aborted = true;
            }
            handle.abort();
        }
        aborted
    }
}

/// Result of a file selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Started,
}

/// Result of a text submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Reply already appended
    Answered,
    /// Reply will be appended once the typing delay elapses
    Pending,
}

/// One chat session: upload simulation, mock dataset, conversation and the
/// chart container, with every timer held as a cancellable task.
#[derive(Clone)]
pub struct Session<G, K>
where
    G: DatasetSource + Clone,
    K: ChartSink + Clone,
{
    id: Uuid,
    state: Arc<Mutex<SessionState>>,
    tasks: Arc<Mutex<SessionTasks>>,
    generator: G,
    sink: K,
    dispatcher: QueryDispatcher,
    timings: Timings,
}

impl<G, K> Session<G, K>
where
    G: DatasetSource + Clone,
    K: ChartSink + Clone,
{
    pub fn new(generator: G, sink: K, timings: Timings) -> Self {
        let id = Uuid::new_v4();
        info!("🆕 [Session-{}] Created", id);
        Self {
            id,
            state: Arc::new(Mutex::new(SessionState::new())),
            tasks: Arc::new(Mutex::new(SessionTasks::default())),
            generator,
            sink,
            dispatcher: QueryDispatcher::new(),
            timings,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, SessionState>> {
        self.state
            .lock()
            .map_err(|_| anyhow!("Failed to acquire lock on session state"))
    }

    fn lock_tasks(&self) -> Result<MutexGuard<'_, SessionTasks>> {
        self.tasks
            .lock()
            .map_err(|_| anyhow!("Failed to acquire lock on session tasks"))
    }

    /// Shell entry point for a picked or dropped file.
    ///
    /// A wrong content type appends the rejection message and leaves the
    /// upload state untouched. An accepted file cancels any upload still in
    /// flight and starts over from 0%.
    pub fn select_file(&self, file: FileHandle) -> Result<UploadOutcome, InsightError> {
        if !file.is_spreadsheet() {
            warn!(
                "🚫 [Session-{}] Rejected \"{}\" with content type {:?}",
                self.id, file.name, file.mime_type
            );
            self.lock_state()?
                .conversation
                .append(ChatEntry::system(REJECTED_FILE_MESSAGE));
            return Err(InsightError::UnsupportedFileType {
                mime_type: file.mime_type,
            });
        }

        let generation = {
            let mut state = self.lock_state()?;
            state.generation += 1;
            state.upload.begin(&file.name);
            state.generation
        };

        let mut tasks = self.lock_tasks()?;
        if tasks.abort_upload_work() {
            info!(
                "🛑 [Session-{}] Cancelled previous upload in favour of \"{}\"",
                self.id, file.name
            );
        }
        info!("📤 [Session-{}] Upload #{} started for \"{}\"", self.id, generation, file.name);

        let session = self.clone();
        tasks.pipeline = Some(tokio::spawn(async move {
            if let Err(e) = session.run_pipeline(file, generation).await {
                error!("❌ [Session-{}] Upload #{} failed: {}", session.id, generation, e);
            }
        }));

        Ok(UploadOutcome::Started)
    }

    /// Upload ticks, then dataset generation, then the memory gauge
    async fn run_pipeline(&self, file: FileHandle, generation: u64) -> Result<()> {
        let simulator = UploadSimulator::new(&self.timings);
        let completed = simulator
            .run(|step| {
                let mut state = self.lock_state()?;
                if state.generation != generation {
                    return Ok(TickOutcome::Superseded);
                }
                if state.upload.advance(step) {
                    Ok(TickOutcome::Complete)
                } else {
                    Ok(TickOutcome::Progress(state.upload.progress_percent))
                }
            })
            .await?;
        if !completed {
            return Ok(());
        }
        info!("⚙️ [Session-{}] Upload #{} reached 100%, processing", self.id, generation);

        let generated = self.generator.generate(&file).await;

        let mut state = self.lock_state()?;
        if state.generation != generation {
            return Ok(());
        }
        let dataset = match generated {
            Ok(dataset) => dataset,
            Err(e) => {
                state.upload = UploadState::default();
                state.conversation.append(ChatEntry::system(format!(
                    "Sorry, I couldn't read \"{}\": {}",
                    file.name, e
                )));
                return Err(e.into());
            }
        };

        state.conversation.append(ChatEntry::system(format!(
            "I've analyzed your file \"{}\". The dataset contains {} columns and {} rows. I detected {} missing values. You can now ask me questions about this data.",
            file.name, dataset.column_count, dataset.row_count, dataset.missing_value_count
        )));
        info!(
            "✅ [Session-{}] Dataset ready: {} columns, {} rows, {} missing",
            self.id, dataset.column_count, dataset.row_count, dataset.missing_value_count
        );
        state.dataset = Some(dataset);
        state.upload.mark_ready();
        state.active_view = ActiveView::Preview;
        drop(state);

        self.start_memory_gauge(generation)
    }

    fn start_memory_gauge(&self, generation: u64) -> Result<()> {
        let session = self.clone();
        let refresh = self.timings.memory_refresh;
        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(refresh).await;
                let Ok(mut state) = session.lock_state() else { break };
                if state.generation != generation {
                    break;
                }
                state.memory_usage = rand::thread_rng().gen_range(20..50);
            }
        });

        let mut tasks = self.lock_tasks()?;
        if let Some(previous) = tasks.memory_gauge.replace(handle) {
            previous.abort();
        }
        Ok(())
    }

    /// Shell entry point for typed text.
    ///
    /// Blank text is ignored and a second query while one is still being
    /// answered is refused; neither appends anything. Otherwise the user's
    /// entry is appended before anything else happens.
    pub fn submit_text(&self, text: &str) -> Result<SubmitOutcome, InsightError> {
        if text.trim().is_empty() {
            return Err(InsightError::EmptyQuery);
        }

        {
            let mut state = self.lock_state()?;
            if state.is_typing {
                return Err(InsightError::Busy);
            }
            state.conversation.append(ChatEntry::user(text));

            if state.upload.phase != Phase::Ready {
                let reply =
                    self.dispatcher
                        .dispatch(text, state.dataset.as_ref(), state.upload.phase);
                state.conversation.append(reply.to_entry());
                return Ok(SubmitOutcome::Answered);
            }

            state.is_typing = true;
            state.active_view = ActiveView::Chat;
        }

        let session = self.clone();
        let text = text.to_string();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(session.timings.typing_delay).await;
            if let Err(e) = session.answer(&text) {
                error!("❌ [Session-{}] Failed to answer {:?}: {}", session.id, text, e);
                if let Ok(mut state) = session.lock_state() {
                    state.is_typing = false;
                }
            }
        });
        self.lock_tasks()?.query = Some(handle);

        Ok(SubmitOutcome::Pending)
    }

    /// Suggestions behave exactly like typed text
    pub fn click_suggestion(&self, text: &str) -> Result<SubmitOutcome, InsightError> {
        self.submit_text(text)
    }

    /// Dispatch against the state as it is now; the phase may have changed
    /// since the query was accepted.
    fn answer(&self, text: &str) -> Result<()> {
        let chart = {
            let mut state = self.lock_state()?;
            let reply = self.dispatcher.dispatch(text, state.dataset.as_ref(), state.upload.phase);
            let spec = match (reply.chart, state.dataset.as_ref()) {
                (Some(kind), Some(dataset)) => Some(build_spec(kind, dataset)),
                _ => None,
            };
            state.conversation.append(reply.to_entry());
            state.is_typing = false;
            spec
        };

        if let Some(spec) = chart {
            self.sink.render(CHART_CONTAINER, &spec)?;
        }
        Ok(())
    }

    pub fn request_clear(&self) -> Result<()> {
        self.lock_state()?.conversation.request_clear();
        Ok(())
    }

    pub fn cancel_clear(&self) -> Result<()> {
        self.lock_state()?.conversation.cancel_clear();
        Ok(())
    }

    /// Returns whether the log was actually cleared
    pub fn confirm_clear(&self) -> Result<bool> {
        let cleared = self.lock_state()?.conversation.confirm_clear();
        if cleared {
            info!("🧹 [Session-{}] Chat history cleared", self.id);
        } else {
            warn!(
                "⚠️ [Session-{}] Clear confirmed without a pending request, ignoring",
                self.id
            );
        }
        Ok(cleared)
    }

    pub fn snapshot(&self) -> Result<SessionSnapshot> {
        let state = self.lock_state()?;
        Ok(SessionSnapshot {
            session_id: self.id,
            messages: state.conversation.entries().to_vec(),
            upload: state.upload.clone(),
            dataset: state.dataset.clone(),
            active_view: state.active_view,
            is_typing: state.is_typing,
            clear_pending: state.conversation.is_clear_pending(),
            memory_usage: state.memory_usage,
        })
    }

    /// Stop every timer and release the chart container
    pub fn shutdown(&self) -> Result<()> {
        let mut tasks = self.lock_tasks()?;
        tasks.abort_upload_work();
        let pending_query = tasks.query.take();
        drop(tasks);
        if let Some(query) = pending_query {
            query.abort();
            self.lock_state()?.is_typing = false;
        }

        self.sink.dispose(CHART_CONTAINER)?;
        info!(
            "👋 [Session-{}] Shut down, {} chart(s) still live",
            self.id,
            self.sink.live_instances()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::conversation::Author;
    use crate::models::upload::XLSX_MIME_TYPE;
    use crate::services::conversation::{CLEARED_MESSAGE, WELCOME_MESSAGE};
    use crate::services::query_dispatcher::{FALLBACK_MESSAGE, NOT_READY_MESSAGE};
    use crate::services::{MockDatasetGenerator, SvgChartSink};
    use std::time::Duration;
    use tokio::time::sleep;

    type TestSession = Session<MockDatasetGenerator, SvgChartSink>;

    fn session() -> TestSession {
        let timings = Timings::default();
        Session::new(
            MockDatasetGenerator::with_seed(timings.processing_delay, 42),
            SvgChartSink::new(),
            timings,
        )
    }

    fn xlsx(name: &str) -> FileHandle {
        FileHandle::new(name, XLSX_MIME_TYPE, vec![0u8; 16])
    }

    /// 10 ticks of 200ms plus 2s of processing, with some slack
    async fn wait_until_ready() {
        sleep(Duration::from_millis(4100)).await;
    }

    async fn ready_session() -> TestSession {
        let s = session();
        s.select_file(xlsx("customers.xlsx")).unwrap();
        wait_until_ready().await;
        assert_eq!(s.snapshot().unwrap().upload.phase, Phase::Ready);
        s
    }

    fn last_text(s: &TestSession) -> String {
        s.snapshot().unwrap().messages.last().unwrap().text.clone()
    }

    #[tokio::test(start_paused = true)]
    async fn wrong_mime_type_is_rejected_without_state_change() {
        let s = session();
        for mime in ["text/csv", "application/vnd.ms-excel", ""] {
            let before = s.snapshot().unwrap().messages.len();
            let err = s.select_file(FileHandle::new("data.csv", mime, vec![])).unwrap_err();
            assert!(matches!(err, InsightError::UnsupportedFileType { .. }));

            let snap = s.snapshot().unwrap();
            assert_eq!(snap.messages.len(), before + 1);
            assert_eq!(snap.messages.last().unwrap().text, REJECTED_FILE_MESSAGE);
            assert_eq!(snap.upload.phase, Phase::Idle);
            assert_eq!(snap.upload.progress_percent, 0);
        }
        sleep(Duration::from_secs(10)).await;
        assert_eq!(s.snapshot().unwrap().upload.phase, Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn progress_is_monotonic_and_hits_100_before_processing() {
        let s = session();
        s.select_file(xlsx("customers.xlsx")).unwrap();
        assert_eq!(s.snapshot().unwrap().upload.progress_percent, 0);
        assert_eq!(s.snapshot().unwrap().upload.phase, Phase::Uploading);

        // sample between ticks
        sleep(Duration::from_millis(100)).await;
        let mut samples = Vec::new();
        for _ in 0..12 {
            let upload = s.snapshot().unwrap().upload;
            samples.push((upload.progress_percent, upload.phase));
            sleep(Duration::from_millis(200)).await;
        }

        assert!(samples.windows(2).all(|w| w[0].0 <= w[1].0));
        for (progress, phase) in &samples {
            if *phase == Phase::Processing {
                assert_eq!(*progress, 100);
            }
        }
        assert_eq!(samples[0], (0, Phase::Uploading));
        assert_eq!(samples[10], (100, Phase::Processing));
    }

    #[tokio::test(start_paused = true)]
    async fn dataset_ready_appends_summary_and_switches_to_preview() {
        let s = ready_session().await;
        let snap = s.snapshot().unwrap();
        let dataset = snap.dataset.unwrap();
        assert_eq!(dataset.row_count, 487);
        assert_eq!(dataset.missing_value_count, 23);
        assert_eq!(snap.active_view, ActiveView::Preview);
        assert_eq!(snap.messages.len(), 2);
        assert_eq!(
            snap.messages[1].text,
            "I've analyzed your file \"customers.xlsx\". The dataset contains 10 columns and 487 rows. I detected 23 missing values. You can now ask me questions about this data."
        );
    }

    #[tokio::test(start_paused = true)]
    async fn memory_gauge_moves_after_ready() {
        let s = ready_session().await;
        assert_eq!(s.snapshot().unwrap().memory_usage, INITIAL_MEMORY_USAGE);
        let mut seen = Vec::new();
        for _ in 0..5 {
            sleep(Duration::from_millis(5000)).await;
            seen.push(s.snapshot().unwrap().memory_usage);
        }
        assert!(seen.iter().all(|m| (20..50).contains(m)));
    }

    #[tokio::test(start_paused = true)]
    async fn query_before_ready_gets_fixed_reply_immediately() {
        let s = session();
        for q in ["What is the average income?", "Compare loan defaults by gender", "hi"] {
            assert_eq!(s.submit_text(q).unwrap(), SubmitOutcome::Answered);
            let snap = s.snapshot().unwrap();
            let n = snap.messages.len();
            assert_eq!(snap.messages[n - 2].author, Author::User);
            assert_eq!(snap.messages[n - 2].text, q);
            assert_eq!(snap.messages[n - 1].text, NOT_READY_MESSAGE);
            assert!(!snap.is_typing);
        }

        // also while still uploading
        s.select_file(xlsx("a.xlsx")).unwrap();
        sleep(Duration::from_millis(500)).await;
        s.submit_text("average income").unwrap();
        assert_eq!(last_text(&s), NOT_READY_MESSAGE);
    }

    #[tokio::test(start_paused = true)]
    async fn blank_text_is_ignored() {
        let s = ready_session().await;
        let before = s.snapshot().unwrap().messages.len();
        assert!(matches!(s.submit_text("   \n\t"), Err(InsightError::EmptyQuery)));
        assert!(matches!(s.submit_text(""), Err(InsightError::EmptyQuery)));
        assert_eq!(s.snapshot().unwrap().messages.len(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn user_entry_then_typing_then_reply() {
        let s = ready_session().await;
        let before = s.snapshot().unwrap().messages.len();

        assert_eq!(s.submit_text("What is the average income?").unwrap(), SubmitOutcome::Pending);
        let snap = s.snapshot().unwrap();
        assert_eq!(snap.messages.len(), before + 1);
        assert_eq!(snap.messages.last().unwrap().author, Author::User);
        assert!(snap.is_typing);
        assert_eq!(snap.active_view, ActiveView::Chat);

        sleep(Duration::from_millis(1400)).await;
        assert_eq!(s.snapshot().unwrap().messages.len(), before + 1);

        sleep(Duration::from_millis(200)).await;
        let snap = s.snapshot().unwrap();
        assert!(!snap.is_typing);
        let reply = snap.messages.last().unwrap();
        assert_eq!(reply.text, "The average income in the dataset is $42,873.");
        assert!(!reply.has_chart);
        assert_eq!(snap.messages.len(), before + 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_submission_is_refused() {
        let s = ready_session().await;
        s.submit_text("average income").unwrap();
        let len = s.snapshot().unwrap().messages.len();
        assert!(matches!(s.submit_text("top products"), Err(InsightError::Busy)));
        assert_eq!(s.snapshot().unwrap().messages.len(), len);

        sleep(Duration::from_millis(1600)).await;
        assert_eq!(s.submit_text("top products").unwrap(), SubmitOutcome::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn job_chart_reply_renders_into_the_shared_container() {
        let s = ready_session().await;
        s.submit_text("Show chart of transactions by job").unwrap();
        sleep(Duration::from_millis(1600)).await;

        let snap = s.snapshot().unwrap();
        let reply = snap.messages.last().unwrap();
        assert_eq!(reply.text, "Here's a chart showing transactions by job category:");
        assert!(reply.has_chart);

        let live = s.sink().current(CHART_CONTAINER).unwrap().unwrap();
        assert_eq!(live.spec.kind, crate::models::chart::ChartKind::TransactionsByJob);
        assert_eq!(live.spec.style, crate::models::chart::ChartStyle::Bar);
        let total: f64 = live.spec.series[0].values.iter().sum();
        assert_eq!(total as usize, snap.dataset.unwrap().sample_rows.len());
    }

    #[tokio::test(start_paused = true)]
    async fn successive_charts_leave_one_live_instance() {
        let s = ready_session().await;
        for q in [
            "Compare loan defaults by gender",
            "Show monthly revenue trend",
            "Compare loan defaults by gender",
        ] {
            s.submit_text(q).unwrap();
            sleep(Duration::from_millis(1600)).await;
            assert_eq!(s.sink().live_instances(), 1);
        }
        let live = s.sink().current(CHART_CONTAINER).unwrap().unwrap();
        assert_eq!(live.spec.kind, crate::models::chart::ChartKind::LoanDefaultsByGender);
    }

    #[tokio::test(start_paused = true)]
    async fn unrecognized_query_falls_back() {
        let s = ready_session().await;
        s.click_suggestion("what's the weather like").unwrap();
        sleep(Duration::from_millis(1600)).await;
        assert_eq!(last_text(&s), FALLBACK_MESSAGE);
        assert_eq!(s.sink().live_instances(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn new_file_cancels_the_previous_upload() {
        let s = session();
        s.select_file(xlsx("first.xlsx")).unwrap();
        sleep(Duration::from_millis(1100)).await;
        assert_eq!(s.snapshot().unwrap().upload.progress_percent, 50);

        s.select_file(xlsx("second.xlsx")).unwrap();
        let upload = s.snapshot().unwrap().upload;
        assert_eq!(upload.progress_percent, 0);
        assert_eq!(upload.file_name, "second.xlsx");

        wait_until_ready().await;
        let snap = s.snapshot().unwrap();
        assert_eq!(snap.upload.phase, Phase::Ready);
        let summaries: Vec<_> = snap
            .messages
            .iter()
            .filter(|m| m.text.starts_with("I've analyzed your file"))
            .collect();
        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].text.contains("second.xlsx"));

        // nothing left over from the first upload
        sleep(Duration::from_secs(10)).await;
        assert_eq!(s.snapshot().unwrap().messages.len(), snap.messages.len());
    }

    #[tokio::test(start_paused = true)]
    async fn reselecting_while_typing_blocks_analytical_replies() {
        let s = ready_session().await;
        s.submit_text("What is the average income?").unwrap();
        s.select_file(xlsx("other.xlsx")).unwrap();
        sleep(Duration::from_millis(1600)).await;
        assert_eq!(last_text(&s), NOT_READY_MESSAGE);
        assert!(!s.snapshot().unwrap().is_typing);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_requires_confirmation() {
        let s = ready_session().await;
        s.submit_text("avg income").unwrap();
        sleep(Duration::from_millis(1600)).await;
        let len = s.snapshot().unwrap().messages.len();

        assert!(!s.confirm_clear().unwrap());
        assert_eq!(s.snapshot().unwrap().messages.len(), len);

        s.request_clear().unwrap();
        assert!(s.snapshot().unwrap().clear_pending);
        s.cancel_clear().unwrap();
        assert!(!s.confirm_clear().unwrap());

        s.request_clear().unwrap();
        assert!(s.confirm_clear().unwrap());
        let snap = s.snapshot().unwrap();
        assert_eq!(snap.messages.len(), 1);
        assert_eq!(snap.messages[0].text, CLEARED_MESSAGE);
        // the dataset survives a clear
        assert_eq!(snap.upload.phase, Phase::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_timers_and_disposes_chart() {
        let s = ready_session().await;
        s.submit_text("top products").unwrap();
        sleep(Duration::from_millis(1600)).await;
        assert_eq!(s.sink().live_instances(), 1);

        s.submit_text("average income").unwrap();
        s.shutdown().unwrap();
        assert_eq!(s.sink().live_instances(), 0);

        let len = s.snapshot().unwrap().messages.len();
        let usage = s.snapshot().unwrap().memory_usage;
        sleep(Duration::from_secs(20)).await;
        assert_eq!(s.snapshot().unwrap().messages.len(), len);
        assert_eq!(s.snapshot().unwrap().memory_usage, usage);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_mid_reply_clears_typing_indicator() {
        let s = ready_session().await;
        s.submit_text("average income").unwrap();
        assert!(s.snapshot().unwrap().is_typing);

        s.shutdown().unwrap();
        let snap = s.snapshot().unwrap();
        assert!(!snap.is_typing);

        sleep(Duration::from_millis(2000)).await;
        assert_eq!(s.snapshot().unwrap().messages.len(), snap.messages.len());
        assert!(!s.snapshot().unwrap().is_typing);
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_session_starts_with_welcome() {
        let snap = session().snapshot().unwrap();
        assert_eq!(snap.messages.len(), 1);
        assert_eq!(snap.messages[0].text, WELCOME_MESSAGE);
        assert_eq!(snap.upload.phase, Phase::Idle);
        assert!(snap.dataset.is_none());
    }
}
