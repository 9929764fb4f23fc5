use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("IO error\n{0}")]
    Read(#[from] std::io::Error),

    #[error("askama templating error\n{0}")]
    Askama(#[from] askama::Error),

    #[error("reqwest error\n{0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned {0}")]
    UpstreamStatus(reqwest::StatusCode),

    #[error("serde_yaml error\n{0}")]
    SerdeYaml(#[from] serde_yaml::Error),

    #[error("serde_json error\n{0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("blocking pool error\n{0}")]
    Blocking(#[from] actix_web::error::BlockingError),
}

impl actix_web::error::ResponseError for DashboardError {}
