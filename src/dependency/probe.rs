use async_trait::async_trait;
use tokio::process::Command;

use crate::core::ProbeError;

/// Runs one external command and hands back its stdout.
#[async_trait]
pub trait ProcessProbe: Send + Sync {
    async fn run(&self, command_line: &str) -> Result<String, ProbeError>;
}

/// Executes probes as child processes of the current one.
///
/// The command line is split on whitespace; no shell is involved.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessProbe;

#[async_trait]
impl ProcessProbe for SystemProcessProbe {
    async fn run(&self, command_line: &str) -> Result<String, ProbeError> {
        let mut parts = command_line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| ProbeError::new(command_line, "Empty command line"))?;

        let output = Command::new(program)
            .args(parts)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ProbeError::new(command_line, format!("Command failed: {}: {}", command_line, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProbeError::new(
                command_line,
                format!(
                    "Command failed: {} ({}): {}",
                    command_line,
                    output.status,
                    stderr.trim()
                ),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_command_line_is_rejected() {
        let err = SystemProcessProbe.run("   ").await.unwrap_err();
        assert_eq!(err.message, "Empty command line");
    }

    #[tokio::test]
    async fn test_missing_binary_fails() {
        let err = SystemProcessProbe
            .run("definitely-not-a-real-binary-7f3a --version")
            .await
            .unwrap_err();
        assert_eq!(err.command, "definitely-not-a-real-binary-7f3a --version");
        assert!(err.message.starts_with("Command failed"));
    }
}
