//! Constants shared by the config flow and the STT platform.

/// Integration domain, used for device identifiers and persisted entries.
pub const DOMAIN: &str = "openai_compatible_stt";

pub const CONF_API_KEY: &str = "api_key";
pub const CONF_URL: &str = "base_url";
pub const CONF_MODEL: &str = "model";

pub const DEFAULT_URL: &str = "https://api.openai.com/v1/";
pub const DEFAULT_MODEL: &str = "whisper-1";
pub const DEFAULT_LANGUAGE: &str = "en";

pub const MANUFACTURER: &str = "OpenAI Compatible";

/// Format for generated entity ids; `{}` is replaced by the slugified model.
pub const ENTITY_ID_FORMAT: &str = "stt.openai_compatible_stt_{}";

/// Model suggestions offered by the setup form. Any other model name may be
/// typed in as a custom value.
pub const MODELS: &[&str] = &[
    "whisper-1",
    "gpt-4o-transcribe",
    "gpt-4o-mini-transcribe",
    "whisper-large-v3",
    "whisper-large-v3-turbo",
    "distil-whisper-large-v3-en",
];

/// Languages accepted by Whisper style transcription endpoints (ISO 639-1).
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "af", "ar", "az", "be", "bg", "bs", "ca", "cs", "cy", "da", "de", "el", "en", "es", "et", "fa",
    "fi", "fr", "gl", "he", "hi", "hr", "hu", "hy", "id", "is", "it", "ja", "kk", "kn", "ko", "lt",
    "lv", "mi", "mk", "mr", "ms", "ne", "nl", "no", "pl", "pt", "ro", "ru", "sk", "sl", "sr", "sv",
    "sw", "ta", "th", "tl", "tr", "uk", "ur", "vi", "zh",
];
