//! journey-cli: terminal front end for the journey dashboard API
//!
//! Each subcommand maps to one dashboard section and reads it from a running
//! `journey-server` over HTTP.
//!
//! # Subcommands
//! - `dashboard`               — summary: snapshot, upcoming, recent messages
//! - `timeline`                — full journey, oldest first
//! - `messages [-n <limit>]`   — conversation log, newest first
//! - `specialists`             — specialist roster
//! - `profile`                 — client profile and user id
//! - `ask <question>`          — ask why a decision was made
//! - `status`                  — show server health

use clap::{Parser, Subcommand};
use journey_core::reference::Trend;
use journey_core::views::truncate;
use journey_core::{AnswerOrigin, AppState, DecisionAnswer, EntryKind, Section, TimelineEntry};
use serde::Deserialize;

const DEFAULT_SERVER: &str = "http://127.0.0.1:8766";

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "journey-cli",
    version,
    about = "Health journey dashboard in the terminal"
)]
struct Cli {
    /// Journey HTTP server URL (overrides JOURNEY_HTTP_URL env var)
    #[arg(long, env = "JOURNEY_HTTP_URL", default_value = DEFAULT_SERVER)]
    server: String,

    /// Print the raw JSON response instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Dashboard summary
    Dashboard,

    /// Full journey timeline
    Timeline,

    /// Conversation log, most recent first
    Messages {
        /// Only show the N most recent messages
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Specialist roster
    Specialists,

    /// Client profile
    Profile,

    /// Ask about a decision in the journey
    Ask {
        /// The question, e.g. "Why was the Whoop strap suggested?"
        question: Vec<String>,
    },

    /// Show journey server status
    Status,
}

impl Commands {
    fn section(&self) -> Option<Section> {
        match self {
            Commands::Dashboard => Some(Section::Dashboard),
            Commands::Timeline => Some(Section::Journey),
            Commands::Messages { .. } => Some(Section::Messages),
            Commands::Specialists => Some(Section::Specialists),
            Commands::Profile => Some(Section::Profile),
            Commands::Ask { .. } => Some(Section::DecisionQuery),
            Commands::Status => None,
        }
    }
}

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct MetricDto {
    pub label: String,
    pub value: String,
    pub trend: Trend,
    pub change: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MessagePreviewDto {
    pub sender: String,
    pub date: String,
    pub snippet: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub greeting: String,
    pub metrics: Vec<MetricDto>,
    pub last_updated: String,
    pub upcoming: Vec<String>,
    pub recent_messages: Vec<MessagePreviewDto>,
    pub empty_message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineResponse {
    pub entries: Vec<TimelineEntry>,
    pub empty_message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesResponse {
    pub messages: Vec<TimelineEntry>,
    pub empty_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SpecialistDto {
    pub name: String,
    pub title: String,
    pub role: String,
    pub voice: String,
}

#[derive(Debug, Deserialize)]
pub struct SpecialistsResponse {
    pub specialists: Vec<SpecialistDto>,
}

// ============================================================================
// Formatting
// ============================================================================

pub fn format_dashboard(d: &DashboardResponse) -> String {
    let mut out = format!("{}\n\nCurrent Health Snapshot\n", d.greeting);
    for m in &d.metrics {
        let detail = match &m.change {
            Some(change) => format!("{}{}", m.trend.arrow(), change),
            None => "stable".to_string(),
        };
        out.push_str(&format!("  - {}: {} ({})\n", m.label, m.value, detail));
    }
    out.push_str(&format!("  Last updated: {}\n\nUpcoming Activities\n", d.last_updated));
    for a in &d.upcoming {
        out.push_str(&format!("  - {}\n", a));
    }
    out.push_str("\nRecent Communications\n");
    match &d.empty_message {
        Some(msg) if d.recent_messages.is_empty() => out.push_str(&format!("  {}\n", msg)),
        _ => {
            for m in &d.recent_messages {
                out.push_str(&format!("  \"{}\" - {} ({})\n", m.snippet, m.sender, m.date));
            }
        }
    }
    out
}

/// One timeline entry: timestamp, headline, body, then rationale and pillar
/// when present.
pub fn format_entry(entry: &TimelineEntry) -> String {
    let icon = match entry.kind {
        EntryKind::Message => "💬",
        EntryKind::Event => "✨",
    };
    let mut out = format!("{} {}\n   {}\n", icon, entry.timestamp, entry.headline());
    if !entry.body().is_empty() {
        out.push_str(&format!("   {}\n", entry.body()));
    }
    if let Some(rationale) = &entry.decision_rationale {
        out.push_str(&format!("   Rationale: {}\n", rationale));
    }
    if let Some(pillar) = &entry.pillar {
        out.push_str(&format!("   Pillar: {}\n", pillar));
    }
    out
}

pub fn format_message(entry: &TimelineEntry) -> String {
    format!(
        "[{}] {}: {}",
        entry.timestamp,
        entry.sender.as_deref().unwrap_or("Unknown"),
        entry.body()
    )
}

pub fn format_answer(answer: &DecisionAnswer) -> String {
    match answer.origin {
        AnswerOrigin::Error => answer.explanation_text.clone(),
        AnswerOrigin::Remote | AnswerOrigin::LocalFallback => {
            format!("Elyx AI's Explanation:\n{}", answer.explanation_text)
        }
    }
}

pub fn format_specialist(s: &SpecialistDto) -> String {
    format!(
        "{} ({})\n   Role: {}\n   Voice: {}\n",
        s.name,
        s.title,
        truncate(&s.role, 120),
        s.voice
    )
}

// ============================================================================
// HTTP Client Calls
// ============================================================================

struct Api {
    client: reqwest::blocking::Client,
    server: String,
}

impl Api {
    fn new(server: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            server: server.trim_end_matches('/').to_string(),
        })
    }

    fn get(&self, path: &str) -> anyhow::Result<serde_json::Value> {
        let url = format!("{}{}", self.server, path);
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| anyhow::anyhow!("connection failed to {}: {}", url, e))?;
        read_json(resp)
    }

    fn post(&self, path: &str, body: &serde_json::Value) -> anyhow::Result<serde_json::Value> {
        let url = format!("{}{}", self.server, path);
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(|e| anyhow::anyhow!("connection failed to {}: {}", url, e))?;
        read_json(resp)
    }
}

fn read_json(resp: reqwest::blocking::Response) -> anyhow::Result<serde_json::Value> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        anyhow::bail!("server returned {}: {}", status, body);
    }
    Ok(resp.json()?)
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn do_dashboard(api: &Api, json: bool) -> anyhow::Result<()> {
    let value = api.get("/api/dashboard")?;
    if json {
        return print_json(&value);
    }
    let dashboard: DashboardResponse = serde_json::from_value(value)?;
    print!("{}", format_dashboard(&dashboard));
    Ok(())
}

fn do_timeline(api: &Api, json: bool) -> anyhow::Result<()> {
    let value = api.get("/api/timeline")?;
    if json {
        return print_json(&value);
    }
    let timeline: TimelineResponse = serde_json::from_value(value)?;
    if timeline.entries.is_empty() {
        println!("{}", timeline.empty_message.unwrap_or_default());
        return Ok(());
    }
    for entry in &timeline.entries {
        println!("{}", format_entry(entry));
    }
    Ok(())
}

fn do_messages(api: &Api, limit: Option<usize>, json: bool) -> anyhow::Result<()> {
    let value = api.get("/api/messages")?;
    if json {
        return print_json(&value);
    }
    let log: MessagesResponse = serde_json::from_value(value)?;
    if log.messages.is_empty() {
        println!("{}", log.empty_message.unwrap_or_default());
        return Ok(());
    }
    let limit = limit.unwrap_or(log.messages.len());
    for entry in log.messages.iter().take(limit) {
        println!("{}", format_message(entry));
    }
    Ok(())
}

fn do_specialists(api: &Api, json: bool) -> anyhow::Result<()> {
    let value = api.get("/api/specialists")?;
    if json {
        return print_json(&value);
    }
    let roster: SpecialistsResponse = serde_json::from_value(value)?;
    for s in &roster.specialists {
        println!("{}", format_specialist(s));
    }
    Ok(())
}

fn do_profile(api: &Api, json: bool) -> anyhow::Result<()> {
    let value = api.get("/api/profile")?;
    if json {
        return print_json(&value);
    }
    let profile = &value["profile"];
    println!("{}'s Profile", profile["preferredName"].as_str().unwrap_or("?"));
    println!("  Age:        {}", profile["age"]);
    println!("  Residence:  {}", profile["residence"].as_str().unwrap_or("?"));
    println!("  Occupation: {}", profile["occupation"].as_str().unwrap_or("?"));
    for (heading, key) in [
        ("Core Goals", "goals"),
        ("Behavioral Insights", "behavioralInsights"),
        ("Tech Stack", "techStack"),
    ] {
        println!("\n{}:", heading);
        for item in profile[key].as_array().into_iter().flatten() {
            println!("  - {}", item.as_str().unwrap_or(""));
        }
    }
    if let Some(user_id) = value["userId"].as_str() {
        println!("\nYour User ID: {}", user_id);
    }
    Ok(())
}

fn do_ask(api: &Api, question: &str, json: bool) -> anyhow::Result<()> {
    let mut ui = AppState::new();
    ui.select_section(Section::DecisionQuery);
    ui.set_draft(question);

    let pending = match ui.begin_query() {
        Some(p) => p,
        None => {
            // blank question: the state carries the instructive message
            println!("{}", ui.decision_response.unwrap_or_default());
            return Ok(());
        }
    };

    if !json {
        eprintln!("{}", ui.decision_response.as_deref().unwrap_or_default());
    }

    let value = api.post(
        "/api/decision-query",
        &serde_json::json!({ "question": pending.question }),
    )?;
    if json {
        return print_json(&value);
    }

    let answer: DecisionAnswer = serde_json::from_value(value)?;
    let text = format_answer(&answer);
    ui.complete_query(&pending, answer);
    println!("{}", text);
    Ok(())
}

/// Show the server status by calling GET /health.
fn do_status(api: &Api) -> anyhow::Result<()> {
    let body = api.get("/health")?;
    println!("Journey server: {}", body["status"].as_str().unwrap_or("unknown"));
    println!("Version:        {}", body["version"].as_str().unwrap_or("?"));
    println!("Entries:        {}", body["entries"]);
    println!("Data available: {}", body["dataAvailable"]);
    println!("Explainer:      {}", body["explainer"].as_str().unwrap_or("?"));
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();

    if let Some(section) = cli.command.section() {
        if !cli.json {
            eprintln!("== {} ==", section);
        }
    }

    // Explanation requests may wait on a remote service; views are quick.
    let timeout = match cli.command {
        Commands::Ask { .. } => 60,
        _ => 10,
    };

    let result = Api::new(&cli.server, timeout).and_then(|api| match cli.command {
        Commands::Dashboard => do_dashboard(&api, cli.json),
        Commands::Timeline => do_timeline(&api, cli.json),
        Commands::Messages { limit } => do_messages(&api, limit, cli.json),
        Commands::Specialists => do_specialists(&api, cli.json),
        Commands::Profile => do_profile(&api, cli.json),
        Commands::Ask { question } => do_ask(&api, &question.join(" "), cli.json),
        Commands::Status => do_status(&api),
    });

    if let Err(e) = result {
        eprintln!("journey-cli: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================
