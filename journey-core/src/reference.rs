//! Static reference content shown alongside the journey: the specialist
//! roster, the client profile, and the dashboard's snapshot cards.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
            Trend::Stable => "",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthMetric {
    pub label: &'static str,
    pub value: &'static str,
    pub trend: Trend,
    pub change: Option<&'static str>,
}


pub const HEALTH_SNAPSHOT: &[HealthMetric] = &[
    HealthMetric {
        label: "HRV",
        value: "65ms",
        trend: Trend::Up,
        change: Some("5%"),
    },
    HealthMetric {
        label: "Resting HR",
        value: "58bpm",
        trend: Trend::Down,
        change: Some("3bpm"),
    },
    HealthMetric {
        label: "Glucose Avg",
        value: "95mg/dL",
        trend: Trend::Stable,
        change: None,
    },
];

pub const UPCOMING_ACTIVITIES: &[&str] = &[
    "Aug 22: Water Quality Test (Ruby)",
    "Sept 5: VO2 Max Test (Advik)",
    "Sept 28: Prenuvo MRI (Ruby)",
];

#[derive(Debug, Clone, Serialize)]
pub struct Specialist {
    pub name: &'static str,
    pub title: &'static str,
    pub role: &'static str,
    pub voice: &'static str,
}

pub const SPECIALISTS: &[Specialist] = &[
    Specialist {
        name: "Dr. Warren",
        title: "Medical Strategist",
        role: "Physician and final clinical authority, interprets lab results, approves diagnostic strategies.",
        voice: "Authoritative, precise, scientific.",
    },
    Specialist {
        name: "Advik",
        title: "Performance Scientist",
        role: "Data analysis expert (wearables data), focuses on nervous system, sleep, cardiovascular training.",
        voice: "Analytical, curious, pattern-oriented.",
    },
    Specialist {
        name: "Carla",
        title: "Nutritionist",
        role: "Designs nutrition plans, analyzes food logs and CGM data, supplement recommendations.",
        voice: "Practical, educational, focused on behavioral change.",
    },
    Specialist {
        name: "Rachel",
        title: "PT / Physiotherapist",
        role: "Manages physical movement: strength training, mobility, injury rehabilitation.",
        voice: "Direct, encouraging, focused on form and function.",
    },
    Specialist {
        name: "Dr. Evans",
        title: "Stress Management",
        role: "Provides tools and strategies for stress resilience and cognitive load management.",
        voice: "Practical, insightful, calm.",
    },
    Specialist {
        name: "Ruby",
        title: "Concierge",
        role: "Primary point of contact for logistics, scheduling, reminders, and follow-ups.",
        voice: "Empathetic, organized, proactive.",
    },
    Specialist {
        name: "Neel",
        title: "Concierge Lead",
        role: "Senior leader, major strategic reviews, de-escalates frustrations, connects work to goals.",
        voice: "Strategic, reassuring, focused on the big picture.",
    },
];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfile {
    pub preferred_name: &'static str,
    pub age: u8,
    pub gender: &'static str,
    pub residence: &'static str,
    pub occupation: &'static str,
    pub goals: &'static [&'static str],
    pub behavioral_insights: &'static [&'static str],
    pub tech_stack: &'static [&'static str],
}

pub const CLIENT_PROFILE: ClientProfile = ClientProfile {
    preferred_name: "Rohan Patel",
    age: 46,
    gender: "Male",
    residence: "Singapore",
    occupation: "Regional Head of Sales (FinTech)",
    goals: &[
        "Reduce risk of heart disease (by Dec 2026)",
        "Enhance cognitive function and focus (by June 2026)",
        "Implement annual full-body health screenings (starting Nov 2025)",
    ],
    behavioral_insights: &[
        "Analytical, driven, values efficiency and evidence-based approaches.",
        "Highly motivated but time-constrained. Needs clear, concise plans.",
        "Wife supportive, 2 young kids, employs a cook.",
    ],
    tech_stack: &[
        "Garmin watch (used for runs), considering Oura ring/Whoop.",
        "Willing to enable full data sharing.",
    ],
};

/// First name used in greetings.
pub fn client_first_name() -> &'static str {
    CLIENT_PROFILE
        .preferred_name
        .split_whitespace()
        .next()
        .unwrap_or(CLIENT_PROFILE.preferred_name)
}
