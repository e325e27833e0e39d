// External diagram renderer invocation

use crate::config::RendererConfig;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the renderer as a child process: `<program> <args...> <diagram>`.
///
/// The child's stdout and stderr pass through unchanged. Exit code 0 is the
/// only success signal; a run past the timeout kills the child.
#[derive(Debug, Clone)]
pub struct Renderer {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl Renderer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: Duration::from_secs(120),
        }
    }

    /// `java -jar <resolved jar> -tsvg`, with the configured timeout
    pub fn from_config(config: &RendererConfig) -> Self {
        let jar = config.resolved_jar_path();
        Self::new(
            config.java.clone(),
            vec![
                "-jar".to_string(),
                jar.to_string_lossy().into_owned(),
                config.format_flag.clone(),
            ],
        )
        .with_timeout(Duration::from_secs(config.timeout_secs))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Command line as it would be typed, for diagnostics
    pub fn command_line(&self, diagram: &Path) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.push(diagram.display().to_string());
        parts.join(" ")
    }

    /// Image the renderer writes next to `diagram`
    pub fn output_path(diagram: &Path) -> PathBuf {
        diagram.with_extension("svg")
    }

    /// Render `diagram`, blocking until the child exits or the timeout elapses
    pub fn render(&self, diagram: &Path) -> Result<()> {
        let command = self.command_line(diagram);
        tracing::info!("Running renderer: {}", command);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(diagram)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::renderer(&command, None, format!("failed to start: {}", e)))?;

        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                if status.success() {
                    tracing::debug!("Renderer finished in {:?}", started.elapsed());
                    return Ok(());
                }
                return Err(Error::renderer(
                    command,
                    status.code(),
                    "renderer exited with a failure status",
                ));
            }

            if started.elapsed() >= self.timeout {
                if let Err(e) = child.kill() {
                    tracing::warn!("Failed to kill renderer: {}", e);
                }
                let _ = child.wait();
                return Err(Error::RendererTimeout {
                    command,
                    timeout_secs: self.timeout.as_secs(),
                });
            }

            thread::sleep(POLL_INTERVAL);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_command_line() {
        let config = RendererConfig {
            jar_path: Some(PathBuf::from("/tools/plantuml.jar")),
            ..RendererConfig::default()
        };
        let renderer = Renderer::from_config(&config);
        assert_eq!(
            renderer.command_line(Path::new("out/diagrama.puml")),
            "java -jar /tools/plantuml.jar -tsvg out/diagrama.puml"
        );
        assert_eq!(renderer.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            Renderer::output_path(Path::new("uml_output/diagrama.puml")),
            PathBuf::from("uml_output/diagrama.svg")
        );
    }

    #[test]
    fn test_spawn_failure() {
        let renderer = Renderer::new("/nonexistent/bin/renderer", vec![]);
        match renderer.render(Path::new("d.puml")) {
            Err(Error::RendererExecution { command, exit_code, .. }) => {
                assert!(command.contains("/nonexistent/bin/renderer"));
                assert_eq!(exit_code, None);
            }
            other => panic!("expected renderer error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_success_receives_diagram_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let diagram = dir.path().join("d.puml");
        std::fs::write(&diagram, "@startuml\n@enduml\n").unwrap();

        let renderer = Renderer::new(
            "sh",
            vec!["-c".to_string(), "test -f \"$1\"".to_string(), "sh".to_string()],
        );
        assert!(renderer.render(&diagram).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit() {
        let renderer = Renderer::new("sh", vec!["-c".to_string(), "exit 3".to_string()]);
        match renderer.render(Path::new("d.puml")) {
            Err(Error::RendererExecution { exit_code, .. }) => assert_eq!(exit_code, Some(3)),
            other => panic!("expected renderer error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_child() {
        let renderer = Renderer::new("sh", vec!["-c".to_string(), "sleep 5".to_string()])
            .with_timeout(Duration::from_millis(200));
        let started = Instant::now();
        let result = renderer.render(Path::new("d.puml"));
        assert!(matches!(result, Err(Error::RendererTimeout { .. })));
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
