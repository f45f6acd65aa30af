/// Settings as they arrive from the command line or environment, before any checks
#[derive(Clone, Default)]
pub struct RawConfig {
    pub xero_client_id: Option<String>,
    pub xero_client_secret: Option<String>,
    pub pushover_token: Option<String>,
    pub pushover_user: Option<String>,
    pub participant_name: Option<String>,
    pub participant_chapter: Option<String>,
    pub directory_url: Option<String>,
    pub goal: Option<String>,
}
