//! Anti-fingerprinting scripts injected before any page script runs.
//! Based on puppeteer-extra-plugin-stealth techniques.

use serde::{Deserialize, Serialize};

/// Navigator and WebGL values reported to the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StealthProfile {
    pub languages: Vec<String>,
    pub vendor: String,
    pub platform: String,
    pub webgl_vendor: String,
    pub renderer: String,
}

impl Default for StealthProfile {
    fn default() -> Self {
        Self {
            languages: vec!["en-US".to_string(), "en".to_string()],
            vendor: "Google Inc.".to_string(),
            platform: "Win32".to_string(),
            webgl_vendor: "Intel Inc.".to_string(),
            renderer: "Intel Iris OpenGL Engine".to_string(),
        }
    }
}

/// Patches that do not depend on the profile.
const STATIC_SCRIPTS: &[&str] = &[
    // Remove webdriver property
    r#"
    Object.defineProperty(navigator, 'webdriver', {
        get: () => undefined,
        configurable: true
    });
    "#,
    // Fix chrome object
    r#"
    window.chrome = {
        runtime: {},
        loadTimes: function() {},
        csi: function() {},
        app: {}
    };
    "#,
    // Fix permissions
    r#"
    const originalQuery = window.navigator.permissions.query;
    window.navigator.permissions.query = (parameters) => (
        parameters.name === 'notifications' ?
        Promise.resolve({ state: Notification.permission }) :
        originalQuery(parameters)
    );
    "#,
    // Fix plugins (make it look like regular Chrome)
    r#"
    Object.defineProperty(navigator, 'plugins', {
        get: () => [
            { name: 'Chrome PDF Plugin', filename: 'internal-pdf-viewer', description: 'Portable Document Format' },
            { name: 'Chrome PDF Viewer', filename: 'mhjfbmdgcfjbbpaeojofohoefgiehjai', description: '' },
            { name: 'Native Client', filename: 'internal-nacl-plugin', description: '' }
        ],
        configurable: true
    });
    "#,
    // Remove chromedriver leftovers
    r#"
    delete window.cdc_adoQpoasnfa76pfcZLmcfl_Array;
    delete window.cdc_adoQpoasnfa76pfcZLmcfl_Promise;
    delete window.cdc_adoQpoasnfa76pfcZLmcfl_Symbol;
    "#,
    // Fix hairline feature detection
    r#"
    Object.defineProperty(HTMLElement.prototype, 'offsetHeight', {
        get: function() {
            if (this.id === 'modernizr') return 1;
            return this.getBoundingClientRect().height;
        }
    });
    "#,
];

/// Quote a string as a JavaScript literal.
fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

impl StealthProfile {
    /// All scripts to register for a new page, profile-specific ones last.
    pub fn scripts(&self) -> Vec<String> {
        let languages =
            serde_json::to_string(&self.languages).unwrap_or_else(|_| "[]".to_string());

        let mut scripts: Vec<String> = STATIC_SCRIPTS.iter().map(|s| s.to_string()).collect();

        scripts.push(format!(
            r#"
    Object.defineProperty(navigator, 'languages', {{
        get: () => {},
        configurable: true
    }});
    "#,
            languages
        ));

        scripts.push(format!(
            r#"
    Object.defineProperty(navigator, 'vendor', {{
        get: () => {},
        configurable: true
    }});
    Object.defineProperty(navigator, 'platform', {{
        get: () => {},
        configurable: true
    }});
    "#,
            js_string(&self.vendor),
            js_string(&self.platform)
        ));

        // WebGL vendor/renderer (37445 / 37446 are the unmasked debug constants)
        scripts.push(format!(
            r#"
    const getParameter = WebGLRenderingContext.prototype.getParameter;
    WebGLRenderingContext.prototype.getParameter = function(parameter) {{
        if (parameter === 37445) {{
            return {};
        }}
        if (parameter === 37446) {{
            return {};
        }}
        return getParameter.call(this, parameter);
    }};
    "#,
            js_string(&self.webgl_vendor),
            js_string(&self.renderer)
        ));

        scripts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_carry_profile_values() {
        let scripts = StealthProfile::default().scripts().join("\n");

        assert!(scripts.contains(r#"["en-US","en"]"#));
        assert!(scripts.contains(r#""Google Inc.""#));
        assert!(scripts.contains(r#""Win32""#));
        assert!(scripts.contains(r#""Intel Iris OpenGL Engine""#));
        assert!(scripts.contains("'webdriver'"));
    }

    #[test]
    fn profile_values_are_escaped() {
        let profile = StealthProfile {
            vendor: "Evil\"); alert(1); (\"".to_string(),
            ..Default::default()
        };
        let scripts = profile.scripts().join("\n");
        assert!(scripts.contains(r#""Evil\"); alert(1); (\"""#));
    }
}
