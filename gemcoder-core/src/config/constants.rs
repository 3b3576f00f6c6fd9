/// Model ID constants - sync with the Gemini model catalogue
pub mod models {
    pub const DEFAULT_MODEL: &str = GEMINI_2_5_FLASH;
    pub const SUPPORTED_MODELS: &[&str] = &[
        GEMINI_2_5_FLASH,
        GEMINI_2_5_PRO,
        GEMINI_2_5_FLASH_LITE,
        GEMINI_2_0_FLASH,
    ];

    pub const GEMINI_2_5_PRO: &str = "gemini-2.5-pro";
    pub const GEMINI_2_5_FLASH: &str = "gemini-2.5-flash";
    pub const GEMINI_2_5_FLASH_LITE: &str = "gemini-2.5-flash-lite";
    pub const GEMINI_2_0_FLASH: &str = "gemini-2.0-flash";

    pub fn is_known(model: &str) -> bool {
        SUPPORTED_MODELS.contains(&model)
    }
}

pub mod urls {
    pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
}

pub mod env {
    pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
    pub const FALLBACK_API_KEY_ENV: &str = "GOOGLE_API_KEY";
    pub const MODEL_OVERRIDE: &str = "GEMCODER_MODEL";
    pub const MAX_ITERATIONS_OVERRIDE: &str = "GEMCODER_MAX_ITERATIONS";
}

pub mod defaults {
    pub const CONFIG_FILE_NAME: &str = "gemcoder.toml";
    pub const CONFIG_DIR_NAME: &str = ".gemcoder";
    pub const MAX_ITERATIONS: usize = 6;
    pub const MIN_ITERATIONS: usize = 5;
    pub const MAX_ITERATIONS_CAP: usize = 10;
    pub const MAX_HISTORY_TURNS: usize = 20;
}

/// Tool name constants
pub mod tools {
    pub const RUN_COMMAND: &str = "run_command";
    pub const CREATE_FILE: &str = "create_file";
    pub const CREATE_DIRECTORY: &str = "create_directory";
    pub const READ_FILE: &str = "read_file";
    pub const UPDATE_FILE: &str = "update_file";
    pub const DELETE_FILE: &str = "delete_file";
}

/// Gemini finish reasons that mean the candidate was withheld
pub mod finish_reasons {
    pub const BLOCKED: &[&str] = &[
        "SAFETY",
        "RECITATION",
        "BLOCKLIST",
        "PROHIBITED_CONTENT",
        "SPII",
    ];
}

/// Fixed rules for the advisory project scan
pub mod scan {
    pub const IGNORED_DIRS: &[&str] = &[
        "node_modules",
        ".git",
        "target",
        "dist",
        "build",
        "out",
        ".next",
        ".idea",
        ".vscode",
        "__pycache__",
        "coverage",
    ];
    pub const TEXT_EXTENSIONS: &[&str] = &[
        "rs", "toml", "md", "txt", "js", "jsx", "ts", "tsx", "json", "py", "go", "java", "c",
        "h", "cpp", "hpp", "cs", "rb", "php", "html", "css", "scss", "yaml", "yml", "sh", "sql",
    ];
    pub const DEFAULT_MAX_FILES: usize = 200;
    pub const DEFAULT_MAX_BYTES_PER_FILE: u64 = 64 * 1024;
}
