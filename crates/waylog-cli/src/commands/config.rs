use waylog_core::util::normalize_text_option;

use crate::error::CliError;
use crate::settings::CliSettings;

pub fn run_config_init(
    owner: &str,
    repo: &str,
    branch: Option<String>,
    folder: Option<String>,
    token: Option<String>,
) -> Result<(), CliError> {
    let mut settings = CliSettings::load().map_err(CliError::Config)?;

    settings.remote.owner = normalize_text_option(Some(owner.to_string()));
    settings.remote.repo = normalize_text_option(Some(repo.to_string()));
    settings.remote.branch = normalize_text_option(branch);
    settings.remote.folder = normalize_text_option(folder);
    if let Some(token) = normalize_text_option(token) {
        settings.remote.token = Some(token);
    }

    if settings.remote.owner.is_none() || settings.remote.repo.is_none() {
        return Err(CliError::Config(
            "owner and repo must not be empty".to_string(),
        ));
    }

    let path = settings.save().map_err(CliError::Config)?;
    println!("Saved remote settings to {}", path.display());
    Ok(())
}

pub fn run_config_show() -> Result<(), CliError> {
    let settings = CliSettings::load().map_err(CliError::Config)?;
    let remote = &settings.remote;

    match (&remote.owner, &remote.repo) {
        (Some(owner), Some(repo)) => {
            println!("repository: {owner}/{repo}");
            println!(
                "branch:     {}",
                remote.branch.as_deref().unwrap_or("main")
            );
            println!(
                "folder:     {}",
                remote.folder.as_deref().unwrap_or("entries")
            );
            println!(
                "token:      {}",
                if settings.resolve_remote_config().is_some() {
                    "configured"
                } else {
                    "missing (set WAYLOG_GITHUB_TOKEN)"
                }
            );
        }
        _ => println!("Remote is not configured. Run `waylog config init`."),
    }
    Ok(())
}
