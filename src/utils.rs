use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn generate_code_verifier() -> String {
    random_alphanumeric(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

pub fn generate_session_id() -> String {
    random_alphanumeric(32)
}

/// Session ids double as file names, so only plain alphanumerics pass.
pub fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= 64 && id.chars().all(|c| c.is_ascii_alphanumeric())
}

pub fn now() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

/// Value of cookie `name` from a `Cookie` header.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
}

/// Formats a duration in milliseconds as `"%2d min %2d sec"`, or as
/// `"%2d hr %2d min"` from one hour on.
pub fn time_string(duration_ms: u64) -> String {
    let total_secs = duration_ms / 1000;
    let seconds = total_secs % 60;
    let minutes = (total_secs / 60) % 60;
    let hours = total_secs / 3600;

    if hours == 0 {
        format!("{:2} min {:2} sec", minutes, seconds)
    } else {
        format!("{:2} hr {:2} min", hours, minutes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyNotation {
    Camelot,
    Tonal,
    Both,
}

/// Translates Spotify's pitch class and mode into a readable key.
///
/// An unknown key or mode (Spotify reports `-1` when none was detected)
/// renders as `n/a`.
pub fn get_key(key: i32, mode: i32, notation: KeyNotation) -> String {
    let (camelot, tonal) = match key {
        0 => ("8", "C"),
        1 => ("3", "C#"),
        2 => ("10", "D"),
        3 => ("5", "D#"),
        4 => ("12", "E"),
        5 => ("7", "F"),
        6 => ("2", "F#"),
        7 => ("9", "G"),
        8 => ("4", "G#"),
        9 => ("11", "A"),
        10 => ("6", "A#"),
        11 => ("1", "B"),
        _ => return "n/a".to_string(),
    };

    // major: B / "", minor: A / m
    let (camelot_mode, tonal_mode) = match mode {
        1 => ("B", ""),
        0 => ("A", "m"),
        _ => return "n/a".to_string(),
    };

    match notation {
        KeyNotation::Camelot => format!("{}{}", camelot, camelot_mode),
        KeyNotation::Tonal => format!("{}{}", tonal, tonal_mode),
        KeyNotation::Both => format!(
            "{}{} - {}{}",
            camelot, camelot_mode, tonal, tonal_mode
        ),
    }
}

pub fn title_case(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
