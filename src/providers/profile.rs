use crate::config::Provider;
use crate::providers::Shape;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelInfo {
    pub id: &'static str,
    pub label: &'static str,
}

const fn model(id: &'static str, label: &'static str) -> ModelInfo {
    ModelInfo { id, label }
}

/// Static description of one provider. Adding a provider means adding a
/// `Provider` variant and one entry here.
#[derive(Debug)]
pub struct ProviderProfile {
    pub shape: Shape,
    /// Default endpoint; `{model}` is replaced with the selected model.
    pub endpoint: &'static str,
    pub default_model: &'static str,
    pub extra_headers: &'static [(&'static str, &'static str)],
    pub api_key_env: &'static str,
    pub models: &'static [ModelInfo],
}

impl ProviderProfile {
    pub fn endpoint_for(&self, model: &str) -> String {
        self.endpoint.replace("{model}", model)
    }
}

static GROQ: ProviderProfile = ProviderProfile {
    shape: Shape::ChatCompletions,
    endpoint: "https://api.groq.com/openai/v1/chat/completions",
    default_model: "llama-3.1-8b-instant",
    extra_headers: &[],
    api_key_env: "GROQ_API_KEY",
    models: &[
        model("llama-3.1-8b-instant", "Llama 3.1 8B (Fast)"),
        model("llama-3.1-70b-versatile", "Llama 3.1 70B (Powerful)"),
        model("llama-3.2-3b-preview", "Llama 3.2 3B"),
        model("mixtral-8x7b-32768", "Mixtral 8x7B"),
        model("gemma2-9b-it", "Gemma 2 9B"),
    ],
};

static OPENROUTER: ProviderProfile = ProviderProfile {
    shape: Shape::ChatCompletions,
    endpoint: "https://openrouter.ai/api/v1/chat/completions",
    default_model: "meta-llama/llama-3.1-8b-instruct:free",
    // OpenRouter attributes traffic to an app through these two headers
    extra_headers: &[
        ("HTTP-Referer", "http://localhost"),
        ("X-Title", "chatrelay"),
    ],
    api_key_env: "OPENROUTER_API_KEY",
    models: &[
        model("meta-llama/llama-3.1-8b-instruct:free", "Llama 3.1 8B (Free)"),
        model("google/gemma-2-9b-it:free", "Gemma 2 9B (Free)"),
        model("mistralai/mistral-7b-instruct:free", "Mistral 7B (Free)"),
    ],
};

static HUGGINGFACE: ProviderProfile = ProviderProfile {
    shape: Shape::PromptConcatenation,
    endpoint: "https://api-inference.huggingface.co/models/{model}",
    default_model: "meta-llama/Llama-2-7b-chat-hf",
    extra_headers: &[],
    api_key_env: "HUGGINGFACE_API_KEY",
    models: &[
        model("meta-llama/Llama-2-7b-chat-hf", "Llama 2 7B Chat"),
        model("mistralai/Mistral-7B-Instruct-v0.1", "Mistral 7B Instruct"),
        model("google/flan-t5-large", "FLAN-T5 Large"),
    ],
};

static OPENAI: ProviderProfile = ProviderProfile {
    shape: Shape::ChatCompletions,
    endpoint: "https://api.openai.com/v1/chat/completions",
    default_model: "gpt-4.1-mini",
    extra_headers: &[],
    api_key_env: "OPENAI_API_KEY",
    models: &[
        model("gpt-4.1-mini", "GPT-4.1 mini"),
        model("gpt-4.1", "GPT-4.1"),
        model("gpt-4o-mini", "GPT-4o mini"),
    ],
};

impl Provider {
    pub fn profile(&self) -> &'static ProviderProfile {
        match self {
            Provider::Groq => &GROQ,
            Provider::OpenRouter => &OPENROUTER,
            Provider::HuggingFace => &HUGGINGFACE,
            Provider::OpenAI => &OPENAI,
        }
    }
}
