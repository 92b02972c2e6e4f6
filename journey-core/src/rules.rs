//! Keyword rule books: ordered `(predicate, response)` tables evaluated
//! first-match-wins against a lowercased question.
//!
//! Two tables ship with the crate:
//! - [`RuleBook::dashboard`] — the dashboard's own canned explanations, used
//!   when no explanation service is configured.
//! - [`RuleBook::concierge`] — the table served by the keyword explanation
//!   service (`POST /api/explain-decision`).

/// Placeholder replaced with the original question in default responses.
pub const QUESTION_PLACEHOLDER: &str = "{question}";

/// A rule matches when any of its keywords is a substring of the question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordRule {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub response: &'static str,
}

impl KeywordRule {
    pub const fn new(
        name: &'static str,
        keywords: &'static [&'static str],
        response: &'static str,
    ) -> Self {
        Self {
            name,
            keywords,
            response,
        }
    }

    /// `question_lower` must already be lowercased.
    pub fn matches(&self, question_lower: &str) -> bool {
        self.keywords.iter().any(|k| question_lower.contains(k))
    }
}

#[derive(Debug, Clone)]
pub struct RuleBook {
    rules: Vec<KeywordRule>,
    default_response: &'static str,
}

impl RuleBook {
    pub fn new(rules: Vec<KeywordRule>, default_response: &'static str) -> Self {
        Self {
            rules,
            default_response,
        }
    }

    /// First rule (in table order) whose predicate holds.
    pub fn matched_rule(&self, question: &str) -> Option<&KeywordRule> {
        let lower = question.to_lowercase();
        self.rules.iter().find(|r| r.matches(&lower))
    }

    /// The matched rule's response, or the default with the question filled in.
    pub fn respond(&self, question: &str) -> String {
        match self.matched_rule(question) {
            Some(rule) => {
                tracing::debug!(rule = rule.name, "Keyword rule matched");
                rule.response.to_string()
            }
            None => self.default_response.replace(QUESTION_PLACEHOLDER, question),
        }
    }

    pub fn dashboard() -> Self {
        Self::new(DASHBOARD_RULES.to_vec(), DASHBOARD_DEFAULT)
    }

    pub fn concierge() -> Self {
        Self::new(CONCIERGE_RULES.to_vec(), CONCIERGE_DEFAULT)
    }
}

// ============================================================================
// Dashboard table
// ============================================================================

const APOB_DECISION: &str = "The focus on ApoB came from your Q1 diagnostic panel results, which showed an elevated ApoB of 105 mg/dL. Dr. Warren identified this as a primary marker for long-term cardiovascular risk, aligning with your goal to reduce heart disease risk. Dietary interventions led by Carla and exercise adjustments by Rachel were initiated as the primary strategy to lower this marker, with re-testing planned for Q2.";

const TRAVEL_DECISION: &str = "The comprehensive travel protocol was developed for your frequent international trips, like the one to Tokyo. Advik designed a precise light exposure schedule and Rachel identified suitable gyms near your hotel to maintain your strength program. This proactive approach aims to minimize jet lag and maintain your health routine, ensuring you remain functional and resilient during demanding travel.";

const COUCH_STRETCH_DECISION: &str = "The couch stretch was recommended by Rachel (PT) early in your journey to address lower back pain, which was flagged as a Pillar 4 issue. This pain was likely exacerbated by prolonged sitting during travel. The stretch targets hip flexor tightness, which is a common root cause, and was suggested as a simple, non-invasive first step after you found the seated stretch less effective.";

const DASHBOARD_DEFAULT: &str = "Based on your question about \"{question}\", Rohan's personalized plan recommends this because we identified a correlation in your recent Whoop data between late-night meetings and reduced deep sleep duration. To mitigate this, blue-light blocking glasses were suggested to improve sleep architecture, thereby supporting your cognitive performance goals.";

const DASHBOARD_RULES: &[KeywordRule] = &[
    KeywordRule::new("apob", &["apo b", "apob"], APOB_DECISION),
    KeywordRule::new("travel-protocol", &["travel protocol"], TRAVEL_DECISION),
    KeywordRule::new("couch-stretch", &["couch stretch"], COUCH_STRETCH_DECISION),
];

// ============================================================================
// Concierge service table
// ============================================================================

const APOB_GENERAL: &str = "ApoB is a key marker for cardiovascular risk. To lower it, focus on reducing saturated fats, increasing soluble fiber, and incorporating regular exercise. Your personalized plan likely includes dietary adjustments from Carla and exercise protocols from Rachel.";

const CONCIERGE_DEFAULT: &str = "I'm a simple keyword agent. I can explain decisions related to digestion, ApoB, travel protocols, specific exercises like the couch stretch, or general topics like HRV, stress, exercise, and sleep. Please try rephrasing your question with these keywords.";

const CONCIERGE_RULES: &[KeywordRule] = &[
    KeywordRule::new(
        "poor-digestion",
        &["poor digestion"],
        "For poor digestion, consider incorporating more fiber into your diet through fruits, vegetables, and whole grains. Probiotics might also be helpful. If symptoms persist, consult a nutritionist like Carla.",
    ),
    KeywordRule::new("apob", &["apo b", "apob"], APOB_GENERAL),
    KeywordRule::new(
        "travel-protocol",
        &["travel protocol"],
        "The travel protocol is designed to minimize jet lag and maintain your health routine during business trips. It includes precise light exposure schedules, hydration plans, and in-flight mobility routines. Advik and Rachel typically design these.",
    ),
    KeywordRule::new(
        "couch-stretch",
        &["couch stretch"],
        "The couch stretch was recommended to address hip flexor tightness, a common cause of lower back pain, often exacerbated by prolonged sitting during travel. It's a foundational mobility exercise from Rachel to improve your structural health.",
    ),
    KeywordRule::new(
        "hrv",
        &["hrv"],
        "Heart Rate Variability (HRV) is a key indicator of your autonomic nervous system's balance and recovery. A consistent upward trend in HRV indicates improved resilience. Factors like sleep, stress, and exercise consistency significantly impact it.",
    ),
    KeywordRule::new(
        "stress",
        &["stress"],
        "For stress management, Dr. Evans often recommends techniques like mindful breathing exercises and structured 'shutdown rituals' to help you disengage after demanding periods. Consistent sleep and proper nutrition also play a vital role.",
    ),
    KeywordRule::new(
        "exercise",
        &["exercise"],
        "Your exercise plan is dynamically updated based on your progress and goals. It typically includes a mix of Zone 2 cardio for autonomic health and structured strength training for overall fitness and longevity. Rachel and Advik oversee this.",
    ),
    KeywordRule::new(
        "sleep",
        &["sleep"],
        "Improving sleep quality is crucial. Strategies include optimizing your sleep environment, consistent sleep schedule, and avoiding late-night heavy meals or blue light exposure. Tracking sleep with devices like Whoop helps monitor progress.",
    ),
];
