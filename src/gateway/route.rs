use url::Url;

/// 请求分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// 已知 API 路由
    Dynamic,
    /// 应用外壳和静态资源
    Static,
}

/// 路由分类器
#[derive(Debug, Clone)]
pub struct RouteClassifier {
    fragments: Vec<String>,
}

impl RouteClassifier {
    pub fn new(fragments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
        }
    }

    /// 路径中包含任一 API 路由片段即视为动态请求
    ///
    /// 无法解析的 URL 按原始字符串匹配。
    pub fn classify(&self, url: &str) -> RequestClass {
        let parsed = Url::parse(url).ok();
        let path = parsed.as_ref().map(|u| u.path()).unwrap_or(url);

        if self.fragments.iter().any(|f| path.contains(f.as_str())) {
            RequestClass::Dynamic
        } else {
            RequestClass::Static
        }
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> RouteClassifier {
        RouteClassifier::new(["/predict", "/plant-info", "/translate", "/chat"])
    }

    #[test]
    fn api_routes_are_dynamic() {
        let c = classifier();
        assert_eq!(
            c.classify("http://localhost:8000/plant-info?name=Mint&lang=en"),
            RequestClass::Dynamic
        );
        assert_eq!(c.classify("http://localhost:8000/predict"), RequestClass::Dynamic);
        assert_eq!(c.classify("https://api.example.com/v2/chat"), RequestClass::Dynamic);
    }

    #[test]
    fn assets_are_static() {
        let c = classifier();
        assert_eq!(c.classify("http://localhost:5173/"), RequestClass::Static);
        assert_eq!(c.classify("http://localhost:5173/index.html"), RequestClass::Static);
        assert_eq!(
            c.classify("http://localhost:5173/assets/app.js?ref=/chat"),
            RequestClass::Static
        );
    }

    #[test]
    fn unparsable_url_matches_raw_text() {
        assert_eq!(classifier().classify("/translate"), RequestClass::Dynamic);
        assert_eq!(classifier().classify("/logo.svg"), RequestClass::Static);
    }
}
