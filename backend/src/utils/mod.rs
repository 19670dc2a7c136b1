// FICHIER : backend/src/utils/mod.rs

// =========================================================================
//  FORMAS UTILS - Foundation Layer
// =========================================================================

// --- 1. MODULES INTERNES ---

pub mod config;
pub mod env;
pub mod error;
pub mod fs;
pub mod json;
pub mod logger;
pub mod macros;

// --- 2. FAÇADES SÉMANTIQUES ---
// Points d'entrée que le code applicatif DOIT utiliser.

/// **Core Foundation** : Types de base et Erreurs.
pub mod core {
    pub use super::error::{AppError, Result};
    pub use chrono::{DateTime, Utc};
    pub use uuid::Uuid;
}

/// **Physical Layer (I/O)** : Accès disque (Atomicité).
pub mod io {
    pub use super::fs::{
        create_dir_all, ensure_dir, exists, read_dir, read_json, read_to_string, remove_dir_all,
        remove_file, tempdir, write_atomic, write_json_atomic, Path, PathBuf, TempDir,
    };
}

/// **Data Abstraction** : Manipulation JSON.
pub mod data {
    pub use super::json::{
        from_value, json, merge, parse, stringify, stringify_pretty, to_value, Map, Value,
    };
    pub use serde::{Deserialize, Serialize};
    pub use std::collections::{HashMap, HashSet};
}

/// **Application Context** : Config/Log/Env.
pub mod context {
    pub use super::config::{AppConfig, SESSION_COOKIE};
    pub use super::env::{get, get_or, is_enabled};
    pub use super::logger::init_logging;
}

/// **Le Prélude** : À utiliser via `use crate::utils::prelude::*;`
pub mod prelude {
    pub use super::context::AppConfig;
    pub use super::core::{AppError, Result, Utc, Uuid};
    pub use super::data::{json, Deserialize, Serialize, Value};
    pub use tracing::{debug, error, info, instrument, warn};
}

// =========================================================================
// 3. EXPORTS UTILITAIRES (Requis par le code applicatif)
// =========================================================================

// --> Config & Erreurs
pub use config::AppConfig;
pub use error::{AnyResult, AppError, Result};
pub use logger::init_logging;

// --> Domaine
pub use chrono::{DateTime, Utc};
pub use uuid::Uuid;

// --> Logging
pub use tracing::{debug, error, info, instrument, warn};

// --> Async Runtime & Sync
pub use async_trait::async_trait;
pub use std::sync::{Arc, Mutex, Once, RwLock};

// --> Collections & Types
pub use std::cmp::Ordering;
pub use std::collections::{BTreeMap, HashMap, HashSet};
pub use std::fmt;
pub use std::time::{Duration, Instant};
