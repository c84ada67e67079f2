use crate::cli::args::CliArgs;
use crate::pagination;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(size) = args.page_size {
        validate_page_size(size).map_err(|e| format!("invalid --page-size {size}: {e}"))?;
    }
    if let Some(window) = args.delete_window {
        validate_delete_window(window)
            .map_err(|e| format!("invalid --delete-window {window}: {e}"))?;
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid --timeout, expected positive integer".to_string());
        }
    }
    if let Some(endpoint) = args.endpoint.as_deref() {
        validate_url(endpoint).map_err(|e| format!("invalid --endpoint '{endpoint}': {e}"))?;
    }
    if let Some(proxy) = args.proxy.as_deref() {
        validate_url(proxy).map_err(|e| format!("invalid --proxy '{proxy}': {e}"))?;
    }
    if let Some(model) = args.model.as_deref() {
        if model.trim().is_empty() || model.contains('/') {
            return Err(format!("invalid --model '{model}'"));
        }
    }
    Ok(())
}

pub fn validate_page_size(size: usize) -> Result<(), String> {
    if pagination::is_valid_page_size(size) {
        Ok(())
    } else {
        Err("expected 10, 20, 50 or 100".to_string())
    }
}

pub fn validate_delete_window(seconds: u64) -> Result<(), String> {
    if seconds == 0 || seconds > 3600 {
        return Err("expected 1 to 3600 seconds".to_string());
    }
    Ok(())
}

fn validate_url(raw: &str) -> Result<(), String> {
    let url = reqwest::Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme '{other}'")),
    }
}
