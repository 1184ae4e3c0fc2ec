//! Prediction Formatting
//!
//! Turns raw predictions into rider-facing text. Arrivals are grouped by
//! route + destination in first-seen order, with a localized label set.
//!
//! Two modes exist: the web chat drops arrivals more than 45 minutes out and
//! shows every group; SMS keeps everything but is capped at 3 group lines to
//! stay inside a sensible message length.

use super::{Countdown, Prediction};

/// Web-mode cutoff: arrivals further out than this are not shown.
pub const WEB_HORIZON_MINUTES: u32 = 45;

/// Maximum group lines in an SMS reply.
const SMS_MAX_LINES: usize = 3;

/// Reply language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    En,
    Es,
}

impl Lang {
    /// Parse a config language code; unknown codes fall back to English.
    pub fn from_code(code: &str) -> Self {
        match code.to_ascii_lowercase().as_str() {
            "es" => Lang::Es,
            _ => Lang::En,
        }
    }

    fn route_label(self) -> &'static str {
        match self {
            Lang::En => "Route",
            Lang::Es => "Ruta",
        }
    }

    fn minutes_label(self) -> &'static str {
        match self {
            Lang::En => "minutes",
            Lang::Es => "minutos",
        }
    }

    fn due_text(self) -> &'static str {
        match self {
            Lang::En => "Due",
            Lang::Es => "llega en menos de 1 minuto",
        }
    }

    fn toward_text(self) -> &'static str {
        match self {
            Lang::En => "Going toward",
            Lang::Es => "dirigiéndose a",
        }
    }

    /// Stop has no predictions at all.
    pub fn no_predictions(self) -> &'static str {
        match self {
            Lang::En => "No predictions available for this stop.",
            Lang::Es => "No hay predicciones disponibles para esta parada.",
        }
    }

    /// Everything was filtered out by the web horizon.
    pub fn none_within_horizon(self) -> &'static str {
        match self {
            Lang::En => "No buses expected in the next 45 minutes.",
            Lang::Es => "No se esperan autobuses en los próximos 45 minutos.",
        }
    }

    /// Web chat input did not contain a stop ID.
    pub fn invalid_stop_web(self) -> &'static str {
        match self {
            Lang::En => "Please enter a valid 1-4 digit bus stop number.",
            Lang::Es => "Por favor ingrese un número de parada válido de 1 a 4 dígitos.",
        }
    }

    /// SMS body was not a bare stop ID.
    pub fn invalid_stop_sms(self) -> &'static str {
        match self {
            Lang::En => "Send a valid 1-4 digit stop number.",
            Lang::Es => "Envíe un número de parada válido de 1 a 4 dígitos.",
        }
    }

    /// Sender is over the rate limit.
    pub fn rate_limited(self, limit: u32) -> String {
        match self {
            Lang::En => format!(
                "You've reached the limit of {limit} interactions per hour."
            ),
            Lang::Es => format!(
                "Ha alcanzado el límite de {limit} interacciones por hora."
            ),
        }
    }
}

/// Output shaping per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatMode {
    /// All groups, arrivals beyond [`WEB_HORIZON_MINUTES`] dropped
    Web,
    /// No horizon filter, at most 3 group lines
    Sms,
}

/// Format predictions as one line per route + destination group.
///
/// Returns an empty vec when every arrival was filtered out; the caller
/// distinguishes that from "stop has no predictions" (empty input).
pub fn format_predictions(predictions: &[Prediction], lang: Lang, mode: FormatMode) -> Vec<String> {
    // Vec of (group key, arrival texts) keeps first-seen group order.
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();

    for prediction in predictions {
        let arrival = match &prediction.countdown {
            Countdown::Due => lang.due_text().to_string(),
            Countdown::Minutes(minutes) => {
                if mode == FormatMode::Web && *minutes > WEB_HORIZON_MINUTES {
                    continue;
                }
                format!("{} {}", minutes, lang.minutes_label())
            }
            Countdown::Other(raw) => raw.clone(),
        };

        let destination = prediction
            .destination
            .replace('/', &format!(" {} ", lang.toward_text()));
        let key = format!("{} {} {}", lang.route_label(), prediction.route, destination);

        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, times)) => times.push(arrival),
            None => groups.push((key, vec![arrival])),
        }
    }

    let mut lines: Vec<String> = groups
        .into_iter()
        .map(|(key, times)| format!("{}: {}", key, times.join(" and ")))
        .collect();

    if mode == FormatMode::Sms {
        lines.truncate(SMS_MAX_LINES);
    }

    lines
}

/// Full reply text for a prediction lookup, including the empty cases.
pub fn prediction_reply(predictions: &[Prediction], lang: Lang, mode: FormatMode) -> String {
    if predictions.is_empty() {
        return lang.no_predictions().to_string();
    }

    let lines = format_predictions(predictions, lang, mode);
    if lines.is_empty() {
        return lang.none_within_horizon().to_string();
    }

    lines.join("\n")
}
