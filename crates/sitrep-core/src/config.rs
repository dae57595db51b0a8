use crate::app_config::{AppConfig, Backend, ClassifierKind};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default; only malformed values fail.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let backend = parse_backend(&or_default("INTEL_BACKEND", "gemini"))?;
    let classifier = parse_classifier(&or_default("SITREP_CLASSIFIER", "generative"))?;

    let gemini_api_key = lookup("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());
    let gemini_model = or_default("GEMINI_MODEL", "gemini-flash-latest");
    let gemini_base_url = or_default(
        "GEMINI_BASE_URL",
        "https://generativelanguage.googleapis.com",
    );
    let gemini_max_attempts = parse_u32("GEMINI_MAX_ATTEMPTS", "5")?;
    if gemini_max_attempts == 0 {
        return Err(invalid("GEMINI_MAX_ATTEMPTS", "must be at least 1".to_string()));
    }
    let gemini_backoff_min_secs = parse_u64("GEMINI_BACKOFF_MIN_SECS", "4")?;
    let gemini_backoff_max_secs = parse_u64("GEMINI_BACKOFF_MAX_SECS", "60")?;
    if gemini_backoff_max_secs < gemini_backoff_min_secs {
        return Err(invalid(
            "GEMINI_BACKOFF_MAX_SECS",
            format!("must be >= GEMINI_BACKOFF_MIN_SECS ({gemini_backoff_min_secs})"),
        ));
    }

    let ollama_url = or_default("OLLAMA_URL", "http://localhost:11434/api/generate");
    let ollama_model = or_default("OLLAMA_MODEL", "mistral");
    let ollama_embed_url = or_default(
        "OLLAMA_EMBED_URL",
        "http://localhost:11434/api/embeddings",
    );
    let ollama_embed_model = or_default("OLLAMA_EMBED_MODEL", "nomic-embed-text");

    let top_per_category = parse_usize("OLLAMA_TOP_PER_CATEGORY", "10")?;
    let intel_limit = parse_usize("SITREP_INTEL_LIMIT", "0")?;
    let section_concurrency = parse_usize("SITREP_SECTION_CONCURRENCY", "1")?;
    if section_concurrency == 0 {
        return Err(invalid(
            "SITREP_SECTION_CONCURRENCY",
            "must be at least 1".to_string(),
        ));
    }

    let generate_timeout_secs = parse_u64("SITREP_GENERATE_TIMEOUT_SECS", "300")?;
    let embed_timeout_secs = parse_u64("SITREP_EMBED_TIMEOUT_SECS", "60")?;
    let log_level = or_default("SITREP_LOG_LEVEL", "info");

    Ok(AppConfig {
        backend,
        gemini_api_key,
        gemini_model,
        gemini_base_url,
        gemini_max_attempts,
        gemini_backoff_min_secs,
        gemini_backoff_max_secs,
        ollama_url,
        ollama_model,
        ollama_embed_url,
        ollama_embed_model,
        top_per_category,
        classifier,
        intel_limit,
        section_concurrency,
        generate_timeout_secs,
        embed_timeout_secs,
        log_level,
    })
}

/// Parse a string into a `Backend` variant (case-insensitive).
fn parse_backend(s: &str) -> Result<Backend, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "gemini" => Ok(Backend::Gemini),
        "ollama" => Ok(Backend::Ollama),
        other => Err(ConfigError::InvalidEnvVar {
            var: "INTEL_BACKEND".to_string(),
            reason: format!("expected 'gemini' or 'ollama', got '{other}'"),
        }),
    }
}

/// Parse a string into a `ClassifierKind` variant (case-insensitive).
fn parse_classifier(s: &str) -> Result<ClassifierKind, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "generative" => Ok(ClassifierKind::Generative),
        "embedding" => Ok(ClassifierKind::Embedding),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SITREP_CLASSIFIER".to_string(),
            reason: format!("expected 'generative' or 'embedding', got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
