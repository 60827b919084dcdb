// The run service wires the standings pipeline together:
//   sheet -> activity table -> last N days -> standings -> message -> chat
//
// It runs once per process invocation. Nothing in here retries or catches:
// every failure except the model's (handled inside the composer) is returned
// to the caller, which turns it into a crash report.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::core::ai::AiProvider;
use crate::core::delivery::{ChatDelivery, DeliveryError};
use crate::core::messages::{ComposedMessage, MessageComposer, MessageError};
use crate::core::standings::{
    compute_standings, normalize, select_last_n_days, SheetError, SheetSource, StandingsError,
};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Could not read the workout sheet: {0}")]
    Sheet(#[from] SheetError),
    #[error(transparent)]
    Standings(#[from] StandingsError),
    #[error(transparent)]
    Message(#[from] MessageError),
    #[error("Could not deliver the standings message: {0}")]
    Delivery(#[from] DeliveryError),
}

/// What to read and where to post it.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub spreadsheet_id: String,
    pub range: String,
    pub window_days: i64,
    pub destination: String,
}

pub struct RunService<S: SheetSource, P: AiProvider, D: ChatDelivery> {
    sheets: S,
    composer: MessageComposer<P>,
    delivery: D,
    settings: RunSettings,
}

impl<S: SheetSource, P: AiProvider, D: ChatDelivery> RunService<S, P, D> {
    pub fn new(
        sheets: S,
        composer: MessageComposer<P>,
        delivery: D,
        settings: RunSettings,
    ) -> Self {
        Self {
            sheets,
            composer,
            delivery,
            settings,
        }
    }

    /// Runs the whole pipeline once and returns the delivered message.
    ///
    /// `now` is the local wall-clock time the date window is measured from.
    pub async fn run(&self, now: NaiveDateTime) -> Result<ComposedMessage, RunError> {
        let grid = self
            .sheets
            .fetch_grid(&self.settings.spreadsheet_id, &self.settings.range)
            .await?;
        tracing::debug!(rows = grid.len(), "Fetched workout sheet");

        let table = normalize(&grid)?;
        let window = select_last_n_days(&table, self.settings.window_days, now);
        let standings = compute_standings(&window);
        let message = self.composer.compose(&standings).await?;

        self.delivery
            .send(&self.settings.destination, &message.text)
            .await?;
        tracing::info!(source = ?message.source, "Delivered standings message");

        Ok(message)
    }
}

/// Posts the two crash notifications: a short alert, then the full trace.
pub async fn report_crash<D: ChatDelivery>(
    delivery: &D,
    destination: &str,
    assistant_name: &str,
    trace: &str,
) -> Result<(), DeliveryError> {
    delivery
        .send(destination, &format!("!!!{} is dead!!!", assistant_name))
        .await?;
    delivery.send(destination, trace).await?;
    tracing::info!(destination, "Sent crash report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ai::models::{AiConfig, AiMessage};
    use crate::core::ai::{AiError, AiService};
    use crate::core::messages::templates::{self, TemplateValues, FALLBACK_TEMPLATES};
    use crate::core::messages::message_composer::{FallbackReason, MessageSource};
    use crate::core::messages::FallbackSelection;
    use crate::core::standings::{RawGrid, Standing, Standings};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;
    use std::time::Duration;

    // ------------------------------------------------------------------------
    // Stub collaborators
    // ------------------------------------------------------------------------

    struct FixedSheet(Result<RawGrid, fn() -> SheetError>);

    #[async_trait]
    impl SheetSource for FixedSheet {
        async fn fetch_grid(&self, _: &str, _: &str) -> Result<RawGrid, SheetError> {
            match &self.0 {
                Ok(grid) => Ok(grid.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    /// A model that never answers in time.
    struct HangingModel;

    #[async_trait]
    impl AiProvider for HangingModel {
        async fn chat_complete(&self, _: &[AiMessage], _: &AiConfig) -> Result<String, AiError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("never seen".to_string())
        }
    }

    #[derive(Default)]
    struct RecordingChat {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl ChatDelivery for RecordingChat {
        async fn send(&self, destination: &str, text: &str) -> Result<(), DeliveryError> {
            if self.fail {
                return Err(DeliveryError::Transport("connection reset".to_string()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((destination.to_string(), text.to_string()));
            Ok(())
        }
    }

    // ------------------------------------------------------------------------
    // Fixture: 2 header rows + 7 days for 4 people
    // ------------------------------------------------------------------------

    fn fixture() -> RawGrid {
        let rows: [[&str; 10]; 9] = [
            ["Date", "Weekday", "Anna", "", "Ben", "", "Cleo", "", "Dario", ""],
            ["", "", "Sum", "", "Sum", "", "Sum", "", "Sum", ""],
            ["01.05.2023", "Mo", "x", "", "x", "", "", "", "", ""],
            ["02.05.2023", "Di", "x", "", "", "", "x", "", "", ""],
            ["03.05.2023", "Mi", "", "", "x", "", "", "", "", ""],
            ["04.05.2023", "Do", "x", "", "", "", "", "", "x", ""],
            ["05.05.2023", "Fr", "x", "", "x", "", "x", "", "", ""],
            ["06.05.2023", "Sa", "", "", "", "", "", "", "", ""],
            ["07.05.2023", "So", "x", "", "", "", "", "", "", ""],
        ];
        rows.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn evening_of_the_7th() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 5, 7)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap()
    }

    fn settings() -> RunSettings {
        RunSettings {
            spreadsheet_id: "sheet".to_string(),
            range: "Tracker!A1:J".to_string(),
            window_days: 7,
            destination: "group".to_string(),
        }
    }

    fn service(
        sheet: FixedSheet,
        chat: RecordingChat,
    ) -> RunService<FixedSheet, HangingModel, RecordingChat> {
        service_with_fallback(sheet, chat, FallbackSelection::Random)
    }

    fn service_with_fallback(
        sheet: FixedSheet,
        chat: RecordingChat,
        fallback: FallbackSelection,
    ) -> RunService<FixedSheet, HangingModel, RecordingChat> {
        let ai = AiService::new(
            HangingModel,
            AiConfig {
                timeout: Duration::from_millis(20),
                ..AiConfig::default()
            },
        );
        RunService::new(
            sheet,
            MessageComposer::new(ai, "Gym-Bro-Tron 9001").with_fallback_selection(fallback),
            chat,
            settings(),
        )
    }

    #[tokio::test]
    async fn timed_out_model_delivers_filled_fallback() {
        let service = service(FixedSheet(Ok(fixture())), RecordingChat::default());

        let message = service.run(evening_of_the_7th()).await.unwrap();

        assert_eq!(
            message.source,
            MessageSource::Fallback(FallbackReason::Timeout)
        );

        // Anna 5, Ben 3, Cleo 2, Dario 1
        let expected = Standings::new(vec![
            Standing { person: "Anna".into(), count: 5 },
            Standing { person: "Ben".into(), count: 3 },
            Standing { person: "Cleo".into(), count: 2 },
            Standing { person: "Dario".into(), count: 1 },
        ]);
        let values = TemplateValues::from_standings("Gym-Bro-Tron 9001", &expected).unwrap();
        let candidates: Vec<String> = FALLBACK_TEMPLATES
            .iter()
            .map(|t| templates::fill(t, &values))
            .collect();
        assert!(candidates.contains(&message.text));

        let sent = service.delivery.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], ("group".to_string(), message.text.clone()));
    }

    #[tokio::test]
    async fn window_excludes_days_older_than_a_week() {
        let service = service_with_fallback(
            FixedSheet(Ok(fixture())),
            RecordingChat::default(),
            FallbackSelection::Fixed(0),
        );
        // On the evening of the 8th the 1st drops out. Ben and Cleo tie and keep column order.
        let now = NaiveDate::from_ymd_opt(2023, 5, 8)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap();

        let message = service.run(now).await.unwrap();

        let expected = Standings::new(vec![
            Standing { person: "Anna".into(), count: 4 },
            Standing { person: "Ben".into(), count: 2 },
            Standing { person: "Cleo".into(), count: 2 },
            Standing { person: "Dario".into(), count: 1 },
        ]);
        let values = TemplateValues::from_standings("Gym-Bro-Tron 9001", &expected).unwrap();
        assert_eq!(message.text, templates::fill(FALLBACK_TEMPLATES[0], &values));
        assert!(message.text.contains("Sport-Guru Anna hat diese Woche die Fitness-Liga dominiert und einfach mal 4 Mal"));
        assert!(message.text.contains("Ben und Cleo sind zwar am Start"));
        assert!(message.text.contains("Dario, wenn du"));
    }

    #[tokio::test]
    async fn malformed_sheet_aborts_before_delivery() {
        let mut grid = fixture();
        grid[4][0] = "3rd of May".to_string();
        let service = service(FixedSheet(Ok(grid)), RecordingChat::default());

        let err = service.run(evening_of_the_7th()).await.unwrap_err();

        assert!(matches!(
            err,
            RunError::Standings(StandingsError::MalformedInput(_))
        ));
        assert!(service.delivery.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_sheet_data_is_an_error() {
        let service = service(
            FixedSheet(Err(|| SheetError::NoData("Tracker!A1:J".to_string()))),
            RecordingChat::default(),
        );

        let err = service.run(evening_of_the_7th()).await.unwrap_err();
        assert!(matches!(err, RunError::Sheet(SheetError::NoData(_))));
    }

    #[tokio::test]
    async fn delivery_failure_propagates() {
        let chat = RecordingChat {
            fail: true,
            ..RecordingChat::default()
        };
        let service = service(FixedSheet(Ok(fixture())), chat);

        let err = service.run(evening_of_the_7th()).await.unwrap_err();
        assert!(matches!(err, RunError::Delivery(_)));
    }

    #[tokio::test]
    async fn crash_report_sends_alert_then_trace() {
        let chat = RecordingChat::default();

        report_crash(&chat, "monitor", "Gym-Bro-Tron 9001", "boom\ncaused by: x")
            .await
            .unwrap();

        let sent = chat.sent.lock().unwrap();
        assert_eq!(
            *sent,
            vec![
                (
                    "monitor".to_string(),
                    "!!!Gym-Bro-Tron 9001 is dead!!!".to_string()
                ),
                ("monitor".to_string(), "boom\ncaused by: x".to_string()),
            ]
        );
    }
}
