//! Preset prompt catalog

/// A named prompt template prepended to the user's message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub prompt: &'static str,
}

impl Preset {
    /// Prompt to send, `None` for the plain chat preset
    pub fn active_prompt(&self) -> Option<&'static str> {
        Some(self.prompt).filter(|p| !p.is_empty())
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.icon, self.name)
    }
}

pub const DEFAULT_PRESET_ID: &str = "default";

pub const PRESETS: &[Preset] = &[
    Preset {
        id: DEFAULT_PRESET_ID,
        name: "默认对话",
        icon: "💬",
        prompt: "",
    },
    Preset {
        id: "linux-quick",
        name: "Linux 速查",
        icon: "🐧",
        prompt: "你是一个 Linux 命令行专家。请用最简洁的方式回答问题，直接给出命令和简短说明，不要啰嗦。格式：命令 + 一句话说明 + 必要时给出示例。",
    },
    Preset {
        id: "code-review",
        name: "代码审查",
        icon: "🔍",
        prompt: "你是一个资深代码审查专家。请简洁地指出代码问题、潜在bug、性能问题和改进建议。用列表形式，每条建议包含：问题 + 原因 + 解决方案。",
    },
    Preset {
        id: "debug-helper",
        name: "调试助手",
        icon: "🐛",
        prompt: "你是一个调试专家。请帮我快速定位问题，给出：1) 可能的原因（最多3个）2) 排查步骤 3) 解决方案。保持简洁，直击要害。",
    },
    Preset {
        id: "api-doc",
        name: "API 文档",
        icon: "📚",
        prompt: "你是 API 文档专家。请用简洁的格式说明 API 用法：端点、参数、返回值、示例代码。不要过多解释，重点是实用性。",
    },
    Preset {
        id: "translator",
        name: "翻译助手",
        icon: "🌐",
        prompt: "你是专业翻译。请直接给出翻译结果，不要解释翻译过程。如果是技术术语，在括号中注明英文原文。",
    },
    Preset {
        id: "regex-helper",
        name: "正则表达式",
        icon: "🔤",
        prompt: "你是正则表达式专家。请直接给出正则表达式和简短说明，格式：正则 + 匹配说明 + 测试示例。",
    },
    Preset {
        id: "sql-helper",
        name: "SQL 助手",
        icon: "🗄️",
        prompt: "你是 SQL 专家。请直接给出 SQL 语句和简短说明，不要过多解释。如果有多种写法，给出最优方案。",
    },
    Preset {
        id: "git-helper",
        name: "Git 助手",
        icon: "🌿",
        prompt: "你是 Git 专家。请直接给出 Git 命令和简短说明，格式：命令 + 作用 + 注意事项（如有）。",
    },
    Preset {
        id: "explain-simple",
        name: "简单解释",
        icon: "💡",
        prompt: "请用最简单的语言解释，就像对一个初学者讲解。避免术语，多用比喻和例子。控制在3-5句话内。",
    },
];

/// Slash shortcuts that switch straight to a preset: (command, preset id)
pub const SHORTCUTS: &[(&str, &str)] = &[
    ("trans", "translator"),
    ("code", "code-review"),
    ("debug", "debug-helper"),
    ("linux", "linux-quick"),
    ("sql", "sql-helper"),
    ("regex", "regex-helper"),
    ("git", "git-helper"),
    ("explain", "explain-simple"),
];

pub fn find(id: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.id == id)
}

pub fn default_preset() -> &'static Preset {
    &PRESETS[0]
}

/// Preset selected by a slash shortcut such as `trans`
pub fn for_shortcut(command: &str) -> Option<&'static Preset> {
    SHORTCUTS
        .iter()
        .find(|(name, _)| *name == command)
        .and_then(|(_, id)| find(id))
}

/// Resolve a stored preset id, falling back to the default preset
pub fn resolve(id: Option<&str>) -> &'static Preset {
    id.and_then(find).unwrap_or_else(default_preset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_prompt() {
        assert_eq!(default_preset().id, DEFAULT_PRESET_ID);
        assert_eq!(default_preset().active_prompt(), None);
        assert!(find("translator").unwrap().active_prompt().is_some());
    }

    #[test]
    fn test_every_shortcut_resolves() {
        for (command, id) in SHORTCUTS {
            let preset = for_shortcut(command).unwrap_or_else(|| panic!("/{} is dangling", command));
            assert_eq!(preset.id, *id);
        }
    }

    #[test]
    fn test_ids_unique() {
        let mut ids: Vec<&str> = PRESETS.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), PRESETS.len());
    }

    #[test]
    fn test_resolve_unknown_falls_back() {
        assert_eq!(resolve(Some("nope")).id, DEFAULT_PRESET_ID);
        assert_eq!(resolve(None).id, DEFAULT_PRESET_ID);
        assert_eq!(resolve(Some("sql-helper")).id, "sql-helper");
    }
}
