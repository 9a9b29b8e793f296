use std::collections::HashMap;

/// Palette for model names of 10 UTF-16 units or fewer.
const BASE_COLORS: [&str; 10] = [
    "#1664FF", "#1AC6FF", "#FF8A00", "#3CC780", "#7442D4", "#FFC400", "#304D77", "#B48DEB",
    "#009488", "#FF7DDA",
];

/// Palette for longer model names.
const EXTENDED_COLORS: [&str; 20] = [
    "#5470C6", "#91CC75", "#FAC858", "#EE6666", "#73C0DE", "#3BA272", "#FC8452", "#9A60B4",
    "#EA7CCC", "#4E79A7", "#F28E2B", "#E15759", "#76B7B2", "#59A14F", "#EDC948", "#B07AA1",
    "#FF9DA7", "#9C755F", "#BAB0AC", "#2F4554",
];

/// Colors reserved for well-known models so charts look the same everywhere.
pub fn preferred_model_color(model_name: &str) -> Option<&'static str> {
    let color = match model_name {
        "dall-e" | "dall-e-2" => "rgb(147,112,219)",
        "dall-e-3" => "rgb(153,50,204)",
        "gpt-3.5-turbo" => "rgb(184,227,167)",
        "gpt-3.5-turbo-0613" => "rgb(60,179,113)",
        "gpt-3.5-turbo-1106" => "rgb(32,178,170)",
        "gpt-3.5-turbo-16k" => "rgb(149,252,206)",
        "gpt-3.5-turbo-instruct" => "rgb(168,209,205)",
        "gpt-4" => "rgb(135,206,235)",
        "gpt-4-0613" => "rgb(100,149,237)",
        "gpt-4-1106-preview" => "rgb(30,144,255)",
        "gpt-4-0125-preview" => "rgb(2,177,236)",
        "gpt-4-turbo-preview" => "rgb(2,177,255)",
        "gpt-4-32k" => "rgb(104,111,238)",
        "gpt-4-all" => "rgb(65,105,225)",
        "gpt-4-vision-preview" => "rgb(25,25,112)",
        "gpt-4o" => "rgb(16,163,127)",
        "gpt-4o-mini" => "rgb(94,201,170)",
        "text-embedding-ada-002" => "rgb(255,182,193)",
        "text-embedding-v1" => "rgb(255,174,185)",
        "text-moderation-latest" => "rgb(255,130,171)",
        "tts-1" => "rgb(255,140,0)",
        "tts-1-hd" => "rgb(255,215,0)",
        "whisper-1" => "rgb(245,245,220)",
        "claude-3-opus-20240229" => "rgb(255,132,31)",
        "claude-3-sonnet-20240229" => "rgb(253,135,93)",
        "claude-3-haiku-20240307" => "rgb(255,175,146)",
        "claude-2.1" => "rgb(255,209,190)",
        "deepseek-chat" => "rgb(77,107,254)",
        "deepseek-reasoner" => "rgb(41,72,204)",
        "qwen-max" => "rgb(97,92,237)",
        "qwen-plus" => "rgb(139,135,242)",
        "qwen-turbo" => "rgb(181,178,247)",
        "glm-4" => "rgb(52,120,246)",
        "moonshot-v1-8k" | "moonshot-v1-32k" | "moonshot-v1-128k" => "rgb(30,30,30)",
        _ => return None,
    };
    Some(color)
}

/// Deterministic color for any model name.
///
/// Uses a 32-bit `hash * 31 + unit` string hash over UTF-16 code units, so the
/// same name maps to the same palette entry in every session and on every
/// platform.
pub fn model_to_color(model_name: &str) -> &'static str {
    if let Some(color) = preferred_model_color(model_name) {
        return color;
    }

    let mut hash: i32 = 0;
    let mut len = 0usize;
    for unit in model_name.encode_utf16() {
        hash = hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(i32::from(unit));
        len += 1;
    }
    let hash = i64::from(hash).unsigned_abs();

    let palette: &[&'static str] = if len > 10 { &EXTENDED_COLORS } else { &BASE_COLORS };
    palette[(hash % palette.len() as u64) as usize]
}

/// Session-scoped model → color assignments.
///
/// The preferred table always wins; otherwise the first color handed out for
/// a model is reused on every later refresh.
#[derive(Debug, Clone, Default)]
pub struct ModelColorCache {
    assigned: HashMap<String, String>,
}

impl ModelColorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, model_name: &str) -> String {
        if let Some(color) = preferred_model_color(model_name) {
            return color.to_string();
        }
        self.assigned
            .entry(model_name.to_string())
            .or_insert_with(|| model_to_color(model_name).to_string())
            .clone()
    }

    /// Pin a color for a model, e.g. one restored from a previous view.
    pub fn assign(&mut self, model_name: impl Into<String>, color: impl Into<String>) {
        self.assigned.insert(model_name.into(), color.into());
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}
