use phf::phf_map;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 科目模块（两条科目轨道）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Module {
    /// 阅读与写作
    ReadingWriting,
    /// 数学
    Math,
}

/// 服务端科目名称别名表（小写）
static MODULE_ALIASES: phf::Map<&'static str, Module> = phf_map! {
    "reading_writing" => Module::ReadingWriting,
    "reading-writing" => Module::ReadingWriting,
    "readingwriting" => Module::ReadingWriting,
    "rw" => Module::ReadingWriting,
    "verbal" => Module::ReadingWriting,
    "english" => Module::ReadingWriting,
    "math" => Module::Math,
    "mathematics" => Module::Math,
    "quant" => Module::Math,
};

impl Module {
    /// 服务端规范名称
    pub fn code(self) -> &'static str {
        match self {
            Module::ReadingWriting => "READING_WRITING",
            Module::Math => "MATH",
        }
    }

    /// 界面显示名称
    pub fn display_name(self) -> &'static str {
        match self {
            Module::ReadingWriting => "Reading and Writing",
            Module::Math => "Math",
        }
    }

    /// 从服务端名称解析（忽略大小写，支持别名）
    pub fn from_wire(s: &str) -> Option<Self> {
        MODULE_ALIASES.get(s.trim().to_lowercase().as_str()).copied()
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl Serialize for Module {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Module {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Module::from_wire(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown module: {}", raw)))
    }
}
