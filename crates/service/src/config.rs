//! Service configuration: CLI flags with environment-variable fallbacks.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use vta::config::CompileConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "vta-service", about = "HTTP task service for VTA translation and execution")]
pub struct ServiceConfig {
    /// Address to bind the HTTP listener to.
    #[arg(long, env = "VTA_BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: String,

    /// Maximum number of tasks executing concurrently.
    #[arg(long, env = "VTA_WORKER_CAPACITY", default_value_t = 256)]
    pub capacity: usize,

    /// Per-task wall-clock budget in milliseconds.
    #[arg(long, env = "VTA_TASK_TIMEOUT_MS", default_value_t = 1000)]
    pub task_timeout_ms: u64,

    /// Directory `<task_id>.cpp`/`<task_id>` are written to.
    #[arg(long, env = "VTA_TASKS_DIR", default_value = "tasks")]
    pub tasks_dir: PathBuf,

    /// C++ compiler binary to invoke.
    #[arg(long, env = "VTA_CXX", default_value = "g++")]
    pub cxx: String,

    /// `-ftemplate-depth` passed to the C++ compiler.
    #[arg(long, env = "VTA_TEMPLATE_DEPTH", default_value_t = 50_000)]
    pub template_depth: u32,
}

impl ServiceConfig {
    pub fn task_timeout(&self) -> Duration {
        Duration::from_millis(self.task_timeout_ms)
    }

    pub fn compile_config(&self) -> CompileConfig {
        CompileConfig::new()
            .with_cxx(self.cxx.clone())
            .with_template_depth(self.template_depth)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            bind_addr: "0.0.0.0:8080".to_string(),
            capacity: 256,
            task_timeout_ms: 1000,
            tasks_dir: PathBuf::from("tasks"),
            cxx: "g++".to_string(),
            template_depth: 50_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = ServiceConfig::default();
        assert_eq!(config.capacity, 256);
        assert_eq!(config.task_timeout(), Duration::from_millis(1000));
    }
}
