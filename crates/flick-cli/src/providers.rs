//! Known OpenAI-compatible API providers

/// A model offered by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderModel {
    pub id: &'static str,
    pub name: &'static str,
}

/// An endpoint the client can be pointed at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiProvider {
    pub id: &'static str,
    pub name: &'static str,
    /// Empty for a custom endpoint
    pub base_url: &'static str,
    pub models: &'static [ProviderModel],
}

impl ApiProvider {
    pub fn default_model(&self) -> Option<&'static ProviderModel> {
        self.models.first()
    }
}

pub const PROVIDERS: &[ApiProvider] = &[
    ApiProvider {
        id: "deepseek",
        name: "DeepSeek",
        base_url: "https://api.deepseek.com",
        models: &[
            ProviderModel {
                id: "deepseek-chat",
                name: "DeepSeek Chat",
            },
            ProviderModel {
                id: "deepseek-reasoner",
                name: "DeepSeek Reasoner",
            },
        ],
    },
    ApiProvider {
        id: "siliconflow",
        name: "SiliconFlow",
        base_url: "https://api.siliconflow.cn",
        models: &[
            ProviderModel {
                id: "deepseek-ai/DeepSeek-V3",
                name: "DeepSeek V3",
            },
            ProviderModel {
                id: "Qwen/Qwen2.5-7B-Instruct",
                name: "Qwen 2.5 7B",
            },
            ProviderModel {
                id: "Qwen/Qwen2.5-72B-Instruct",
                name: "Qwen 2.5 72B",
            },
            ProviderModel {
                id: "THUDM/glm-4-9b-chat",
                name: "GLM-4 9B",
            },
            ProviderModel {
                id: "meta-llama/Llama-3.3-70B-Instruct",
                name: "Llama 3.3 70B",
            },
            ProviderModel {
                id: "internlm/internlm2_5-7b-chat",
                name: "InternLM 2.5 7B",
            },
        ],
    },
    ApiProvider {
        id: "custom",
        name: "Custom",
        base_url: "",
        models: &[],
    },
];

pub fn find(id: &str) -> Option<&'static ApiProvider> {
    let id = id.to_lowercase();
    PROVIDERS.iter().find(|p| p.id == id)
}

/// Find a catalog model by exact id, then by partial id or name match
pub fn find_model<'a>(query: &str, models: &'a [ProviderModel]) -> Option<&'a ProviderModel> {
    let query_lower = query.to_lowercase();

    if let Some(model) = models.iter().find(|m| m.id.to_lowercase() == query_lower) {
        return Some(model);
    }

    models.iter().find(|m| {
        m.id.to_lowercase().contains(&query_lower) || m.name.to_lowercase().contains(&query_lower)
    })
}
