//! End-to-end turns: a scripted model drives the real tool executor against
//! the in-memory calendar and sheet.

use async_trait::async_trait;
use chrono::{Days, TimeZone};
use naomi_application::{
    GatewayError, LlmGateway, LlmSession, NoNotifier, NoTurnProgress, RespondInput,
    RespondUseCase,
};
use naomi_domain::{
    ContentBlock, ConversationTurn, CredentialPool, FixedClock, LlmResponse, StopReason,
    TimeResolver, ToolResult,
};
use naomi_infrastructure::{
    InMemoryCalendar, InMemorySheet, JsonSchemaToolConverter, ScheduleServices,
    ScheduleToolExecutor,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

type Scripted = Result<LlmResponse, GatewayError>;

/// Replays canned responses and records what the orchestrator sent back.
struct ScriptedGateway {
    responses: Arc<Mutex<VecDeque<Scripted>>>,
    sent_results: Arc<Mutex<Vec<Vec<ToolResult>>>>,
}

impl ScriptedGateway {
    fn new(responses: Vec<Scripted>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            sent_results: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

struct ScriptedSession {
    responses: Arc<Mutex<VecDeque<Scripted>>>,
    sent_results: Arc<Mutex<Vec<Vec<ToolResult>>>>,
}

impl ScriptedSession {
    fn next(&self) -> Scripted {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Other("script exhausted".to_string())))
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn create_session(
        &self,
        _system_prompt: &str,
        _history: &[ConversationTurn],
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(ScriptedSession {
            responses: self.responses.clone(),
            sent_results: self.sent_results.clone(),
        }))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

#[async_trait]
impl LlmSession for ScriptedSession {
    async fn send_with_tools(
        &self,
        _content: &str,
        _tools: &[serde_json::Value],
    ) -> Result<LlmResponse, GatewayError> {
        self.next()
    }

    async fn send_tool_results(&self, results: &[ToolResult]) -> Result<LlmResponse, GatewayError> {
        self.sent_results.lock().unwrap().push(results.to_vec());
        self.next()
    }
}

fn tool_use(name: &str, args: &[(&str, &str)]) -> ContentBlock {
    let input: HashMap<String, serde_json::Value> = args
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::json!(v)))
        .collect();
    ContentBlock::ToolUse {
        name: name.to_string(),
        input,
    }
}

fn calls(blocks: Vec<ContentBlock>) -> Scripted {
    Ok(LlmResponse {
        content: blocks,
        stop_reason: Some(StopReason::ToolUse),
        model: None,
    })
}

fn text(reply: &str) -> Scripted {
    Ok(LlmResponse::from_text(reply))
}

struct Harness {
    use_case: RespondUseCase,
    calendar: Arc<InMemoryCalendar>,
    sheet: Arc<InMemorySheet>,
    resolver: TimeResolver,
    sent_results: Arc<Mutex<Vec<Vec<ToolResult>>>>,
}

fn harness(script: Vec<Scripted>) -> Harness {
    // Sunday 2026-10-18, 2:30 PM in New York
    let now = chrono::Utc.with_ymd_and_hms(2026, 10, 18, 18, 30, 0).unwrap();
    let resolver =
        TimeResolver::new(chrono_tz::America::New_York).with_clock(Arc::new(FixedClock(now)));

    let calendar = Arc::new(InMemoryCalendar::new());
    let sheet = Arc::new(InMemorySheet::new());
    let executor = ScheduleToolExecutor::new(ScheduleServices {
        calendar: calendar.clone(),
        sheet: sheet.clone(),
        notifier: Arc::new(NoNotifier),
        resolver: resolver.clone(),
    });

    let gateway = ScriptedGateway::new(script);
    let sent_results = gateway.sent_results.clone();
    let use_case = RespondUseCase::new(
        Arc::new(gateway),
        Arc::new(executor),
        Arc::new(JsonSchemaToolConverter),
        Arc::new(CredentialPool::single("test-key").unwrap()),
        resolver.clone(),
    );

    Harness {
        use_case,
        calendar,
        sheet,
        resolver,
        sent_results,
    }
}

#[tokio::test]
async fn test_add_team_sync_tomorrow_at_3pm() {
    let h = harness(vec![
        calls(vec![tool_use(
            "add_to_schedule",
            &[
                ("summary", "Team sync"),
                ("date", "tomorrow"),
                ("time", "3pm"),
                ("category", "work"),
            ],
        )]),
        text("Done, your team sync is on the calendar for tomorrow at 3 PM."),
    ]);

    let output = h
        .use_case
        .execute(
            RespondInput::new("Add a team sync tomorrow at 3pm", &[]),
            &NoTurnProgress,
        )
        .await;

    assert_eq!(
        output.reply,
        "Done, your team sync is on the calendar for tomorrow at 3 PM."
    );
    assert!(output.error.is_none());
    assert!(!output.used_fallback);

    let tomorrow = h.resolver.today().checked_add_days(Days::new(1)).unwrap();
    let expected_start = h.resolver.resolve_point("3pm", tomorrow).unwrap();

    let events = h.calendar.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "[work] Team sync");
    assert_eq!(events[0].start, expected_start);
    assert_eq!(events[0].end - events[0].start, chrono::Duration::hours(1));

    let rows = h.sheet.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], "Team sync");
    assert_eq!(rows[0][5], "FALSE");

    let sent = h.sent_results.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0][0].is_success());
}

#[tokio::test]
async fn test_unknown_category_falls_back_to_general() {
    let h = harness(vec![
        calls(vec![tool_use(
            "add_event",
            &[
                ("summary", "Pay rent"),
                ("date", "2026-10-20"),
                ("time", "9:00 AM"),
                ("category", "urgent"),
                ("item_type", "chore"),
            ],
        )]),
        text("Added."),
    ]);

    h.use_case.respond("Remind me to pay rent", &[]).await;

    let events = h.calendar.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "[general] Pay rent");
    assert_eq!(
        events[0].description.as_deref(),
        Some("Type: event\nNotes: ")
    );
    assert_eq!(h.sheet.rows()[0][3], "general");
}

#[tokio::test]
async fn test_duplicate_calls_write_once() {
    let add = || {
        tool_use(
            "add_to_schedule",
            &[("summary", "Dentist"), ("date", "tomorrow"), ("time", "noon")],
        )
    };
    let h = harness(vec![calls(vec![add(), add()]), text("Booked.")]);

    let output = h
        .use_case
        .execute(RespondInput::new("Book the dentist", &[]), &NoTurnProgress)
        .await;

    assert_eq!(output.tool_results.len(), 1);
    assert_eq!(h.calendar.events().len(), 1);
    assert_eq!(h.sheet.rows().len(), 1);
}

#[tokio::test]
async fn test_alias_twin_writes_once() {
    let gym = [("summary", "Gym"), ("date", "tomorrow"), ("time", "3pm")];
    let h = harness(vec![
        calls(vec![tool_use("add_to_schedule", &gym), tool_use("create_event", &gym)]),
        text("Gym is on for tomorrow."),
    ]);

    let output = h
        .use_case
        .execute(RespondInput::new("Gym tomorrow at 3", &[]), &NoTurnProgress)
        .await;

    assert_eq!(output.tool_results.len(), 1);
    assert_eq!(h.calendar.events().len(), 1);
    assert_eq!(h.sheet.rows().len(), 1);

    let sent = h.sent_results.lock().unwrap();
    let names: Vec<&str> = sent[0].iter().map(|r| r.tool_name.as_str()).collect();
    assert_eq!(names, vec!["add_to_schedule", "create_event"]);
}

#[tokio::test]
async fn test_twins_differing_only_in_defaults_or_case_write_once() {
    let h = harness(vec![
        calls(vec![
            tool_use(
                "add_to_schedule",
                &[("summary", "Standup"), ("time", "9am"), ("category", "Work")],
            ),
            tool_use(
                "add_to_schedule",
                &[
                    ("summary", "Standup"),
                    ("date", "today"),
                    ("time", "9am"),
                    ("category", "work"),
                ],
            ),
        ]),
        text("Standup added."),
    ]);

    h.use_case
        .execute(RespondInput::new("Standup at 9", &[]), &NoTurnProgress)
        .await;

    assert_eq!(h.calendar.events().len(), 1);
    assert_eq!(h.sheet.rows().len(), 1);
}

#[tokio::test]
async fn test_failed_summary_falls_back_to_tool_text() {
    let h = harness(vec![
        calls(vec![tool_use("check_schedule", &[("date", "tomorrow")])]),
        Err(GatewayError::Unavailable("503".to_string())),
    ]);

    let output = h
        .use_case
        .execute(RespondInput::new("What's on tomorrow?", &[]), &NoTurnProgress)
        .await;

    assert!(output.used_fallback);
    assert_eq!(output.reply, "No events found for tomorrow (2026-10-19).");
}

#[tokio::test]
async fn test_unknown_tool_does_not_abort_turn() {
    let h = harness(vec![
        calls(vec![
            tool_use("launch_rocket", &[]),
            tool_use("check_schedule", &[]),
        ]),
        text("I can't launch rockets, but your day is clear."),
    ]);

    let output = h
        .use_case
        .execute(RespondInput::new("Launch and check", &[]), &NoTurnProgress)
        .await;

    assert_eq!(output.tool_results.len(), 2);
    assert!(output.tool_results[0].error().unwrap().is_not_found());
    assert!(output.tool_results[1].is_success());
    assert_eq!(output.reply, "I can't launch rockets, but your day is clear.");
}

#[tokio::test]
async fn test_remove_then_check_in_one_turn() {
    let h = harness(vec![
        calls(vec![tool_use(
            "add_to_schedule",
            &[("summary", "Gym"), ("date", "today"), ("time", "6pm")],
        )]),
        text("Added."),
        calls(vec![
            tool_use("remove_task", &[("keyword", "gym")]),
            tool_use("check_schedule", &[]),
        ]),
        text("Removed the gym session; nothing else today."),
    ]);

    h.use_case.respond("Add gym at 6pm", &[]).await;
    assert_eq!(h.calendar.events().len(), 1);

    let history = vec![
        ConversationTurn::user("Add gym at 6pm"),
        ConversationTurn::assistant("Added."),
    ];
    let output = h
        .use_case
        .execute(
            RespondInput::new("Actually cancel the gym", &history),
            &NoTurnProgress,
        )
        .await;

    assert_eq!(output.tool_results[0].output(), Some("Deleted 1 event(s)."));
    assert!(
        output.tool_results[1]
            .output()
            .unwrap()
            .starts_with("No events found")
    );
    assert!(h.calendar.events().is_empty());
}
