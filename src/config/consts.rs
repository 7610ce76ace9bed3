// src/config/consts.rs

// Event containers (custom elements)
pub const EVENT_TAGS: [&str; 2] = ["psel-event-main", "psel-event-live"];

// Fields inside one container
pub const LINK_TAG: &str = "a";
pub const LINK_CLASS: &str = "psel-event__link";
pub const COMPETITION_TAG: &str = "p";
pub const COMPETITION_CLASS: &str = "psel-event-info__competition";
pub const TIMER_TAG: &str = "time";
pub const TIMER_CLASS: &str = "psel-timer";
pub const DATE_INFO_CLASS: &str = "psel-event-info__date";
pub const OPPONENT_CLASS: &str = "psel-opponent__name";
pub const OUTCOME_TAG: &str = "psel-outcome";
pub const OUTCOME_LABEL_CLASS: &str = "psel-outcome__label";
pub const OUTCOME_DATA_CLASS: &str = "psel-outcome__data";

// Output vocabulary
pub const PROVIDER: &str = "PSEL";
// Must match the `serde(rename)` on `data::Markets::winner`.
pub const MARKET_WINNER: &str = "Vainqueur";
pub const DRAW_LABEL: &str = "Nul";
pub const UNKNOWN_COMPETITION: &str = "Unknown";

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_FILE: &str = "generated_output.json";
pub const DEFAULT_INDENT: usize = 2;

// Logging
pub const DEFAULT_LOG_LEVEL: &str = "info";
