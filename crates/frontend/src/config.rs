/// Runtime settings, fixed at build time through environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub map_image_url: String,
}

pub const DEFAULT_MAP_IMAGE: &str = "/mapa/mapa.png";

impl AppConfig {
    /// `CAMPUS_API_URL` and `CAMPUS_MAP_IMAGE`, falling back to the page origin
    /// and the bundled campus image.
    pub fn load() -> Self {
        Self::resolve(
            option_env!("CAMPUS_API_URL"),
            option_env!("CAMPUS_MAP_IMAGE"),
            page_origin(),
        )
    }

    fn resolve(api: Option<&str>, image: Option<&str>, origin: Option<String>) -> Self {
        let api_base_url = api
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or(origin)
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_string();
        let map_image_url = image
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_MAP_IMAGE)
            .to_string();
        AppConfig {
            api_base_url,
            map_image_url,
        }
    }
}

fn page_origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}
