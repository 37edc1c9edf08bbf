use crate::context::AppContext;
use crate::format::{self, Formattable, OutputFormat};
use libimagetag::{AuthChallenge, TagLister};
use serde::Serialize;

/// Authentication requirements advertised by a registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChallengeOutput {
    pub registry: String,
    pub scheme: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl ChallengeOutput {
    pub fn new(registry: impl Into<String>, challenge: &AuthChallenge) -> Self {
        Self {
            registry: registry.into(),
            scheme: challenge.scheme().to_string(),
            realm: challenge.realm().map(str::to_string),
            service: challenge.service().map(str::to_string),
        }
    }
}

impl Formattable for ChallengeOutput {
    fn format_pretty(&self, ctx: &AppContext) -> String {
        let mut lines = vec![
            format!("Registry: {}", self.registry),
            format!("Scheme:   {}", format::highlight(ctx, &self.scheme)),
        ];
        if let Some(realm) = &self.realm {
            lines.push(format!("Realm:    {}", realm));
        }
        if let Some(service) = &self.service {
            lines.push(format!("Service:  {}", service));
        }
        lines.join("\n")
    }
}

/// Probes the registry, defaulting to the configured one.
pub fn run_challenge(ctx: &AppContext, registry: Option<&str>) -> Result<ChallengeOutput, String> {
    let registry = registry.unwrap_or(&ctx.config.registry.default_url);
    let challenge = TagLister::from_config(&ctx.config)
        .detect_challenge(registry)
        .map_err(|e| e.to_string())?;

    Ok(ChallengeOutput::new(registry, &challenge))
}

/// Handle the challenge command
pub fn handle_challenge(ctx: &AppContext, registry: Option<&str>, format: OutputFormat) {
    let output = match run_challenge(ctx, registry) {
        Ok(output) => output,
        Err(e) => {
            format::error(ctx, &e);
            std::process::exit(1);
        }
    };

    match format::format_output(ctx, &output, format) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            format::error(ctx, &e);
            std::process::exit(1);
        }
    }

    if output.scheme == libimagetag::AuthScheme::Unknown.as_str() {
        format::warning(ctx, "registry advertised no supported authentication scheme");
    }
}

#[cfg(test)]
#[path = "challenge_tests.rs"]
mod tests;
