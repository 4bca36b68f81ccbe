//! Puppetfile parser
//!
//! Handles r10k-style git declarations, one per line:
//! `mod 'owner-name', :git => 'https://github.com/owner/repo', :tag => 'v1.2.3'`
//!
//! Forge-style (`mod 'owner/name', '1.2.3'`) and branch/ref declarations are
//! not recognized and are ignored like any other unmatched line.

use crate::domain::{InvalidTag, Manifest, ManifestEntry, NormalizedVersion};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

static MOD_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"mod\s+'([^']+)',\s+:git\s*=>\s*'([^']+)',\s*:tag\s*=>\s*'([^']+)'").unwrap()
});

/// Result of parsing a Puppetfile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedManifest {
    /// Entries with valid tags
    pub manifest: Manifest,
    /// Entries dropped because their tag is not a semantic version
    pub invalid_tags: Vec<InvalidTag>,
}

/// Parse Puppetfile text into entries and invalid tags
pub fn parse_puppetfile(content: &str) -> ParsedManifest {
    let mut parsed = ParsedManifest::default();

    for (index, line) in content.lines().enumerate() {
        let Some(caps) = MOD_LINE_RE.captures(line.trim()) else {
            continue;
        };

        let name = &caps[1];
        let url = &caps[2];
        let tag = &caps[3];

        // A later declaration replaces any earlier one, valid or not
        parsed.invalid_tags.retain(|t| t.name != name);

        match NormalizedVersion::parse(tag) {
            Ok(version) => {
                debug!(module = name, version = %version, line = index + 1, "parsed module");
                parsed.manifest.insert(ManifestEntry::new(name, url, version));
            }
            Err(e) => {
                warn!(module = name, tag, line = index + 1, "dropping module: {}", e);
                parsed.manifest.remove(name);
                parsed.invalid_tags.push(InvalidTag {
                    name: name.to_string(),
                    raw_tag: tag.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
forge 'https://forge.puppet.com'

# Core modules
mod 'puppetlabs-stdlib', :git => 'https://github.com/puppetlabs/puppetlabs-stdlib', :tag => 'v9.4.1'
mod 'puppetlabs-concat',
  :git => 'https://github.com/puppetlabs/puppetlabs-concat',
  :tag => 'v9.0.0'
mod 'puppet-systemd', :git => 'https://github.com/voxpupuli/puppet-systemd', :tag => '6.2.0'
mod 'internal-profile', :git => 'https://git.example.com/profile', :tag => 'V1.0.0'
mod 'puppetlabs-apt', '9.1.0'
"#;

    #[test]
    fn test_parse_single_line_declarations() {
        let parsed = parse_puppetfile(SAMPLE);
        let names: Vec<_> = parsed.manifest.iter().map(|e| e.name.as_str()).collect();
        // Multi-line and forge-style declarations are not recognized
        assert_eq!(
            names,
            vec!["puppetlabs-stdlib", "puppet-systemd", "internal-profile"]
        );
        assert!(parsed.invalid_tags.is_empty());
    }

    #[test]
    fn test_parse_strips_v_prefix() {
        let parsed = parse_puppetfile(SAMPLE);
        let stdlib = parsed.manifest.get("puppetlabs-stdlib").unwrap();
        assert_eq!(stdlib.pinned_version.as_str(), "9.4.1");
        assert_eq!(
            stdlib.source_url,
            "https://github.com/puppetlabs/puppetlabs-stdlib"
        );
        let profile = parsed.manifest.get("internal-profile").unwrap();
        assert_eq!(profile.pinned_version.as_str(), "1.0.0");
    }

    #[test]
    fn test_parse_is_idempotent() {
        assert_eq!(parse_puppetfile(SAMPLE), parse_puppetfile(SAMPLE));
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        let content =
            "   mod   'a-b',   :git=>'https://github.com/a/b',:tag   =>   'v1.2.3'   # pinned\n";
        let parsed = parse_puppetfile(content);
        assert_eq!(parsed.manifest.len(), 1);
        assert_eq!(
            parsed.manifest.get("a-b").unwrap().pinned_version.as_str(),
            "1.2.3"
        );
    }

    #[test]
    fn test_invalid_tags_collected_once() {
        let content = "\
mod 'a-good', :git => 'https://github.com/a/good', :tag => '1.0.0'
mod 'a-bad', :git => 'https://github.com/a/bad', :tag => 'release-2'
mod 'a-short', :git => 'https://github.com/a/short', :tag => 'v1.2'
";
        let parsed = parse_puppetfile(content);
        assert_eq!(parsed.manifest.len(), 1);
        assert!(parsed.manifest.contains("a-good"));

        let invalid: Vec<_> = parsed
            .invalid_tags
            .iter()
            .map(|t| (t.name.as_str(), t.raw_tag.as_str()))
            .collect();
        assert_eq!(invalid, vec![("a-bad", "release-2"), ("a-short", "v1.2")]);
    }

    #[test]
    fn test_redeclaration_last_wins() {
        let content = "\
mod 'a-x', :git => 'https://github.com/a/x', :tag => '1.0.0'
mod 'a-y', :git => 'https://github.com/a/y', :tag => '1.0.0'
mod 'a-x', :git => 'https://github.com/a/x', :tag => '2.0.0'
";
        let parsed = parse_puppetfile(content);
        let names: Vec<_> = parsed.manifest.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a-x", "a-y"]);
        assert_eq!(
            parsed.manifest.get("a-x").unwrap().pinned_version.as_str(),
            "2.0.0"
        );
    }

    #[test]
    fn test_invalid_redeclaration_drops_earlier_entry() {
        let content = "\
mod 'a-x', :git => 'https://github.com/a/x', :tag => '1.0.0'
mod 'a-x', :git => 'https://github.com/a/x', :tag => 'main'
";
        let parsed = parse_puppetfile(content);
        assert!(parsed.manifest.is_empty());
        assert_eq!(parsed.invalid_tags.len(), 1);
    }

    #[test]
    fn test_valid_redeclaration_clears_invalid_tag() {
        let content = "\
mod 'a-x', :git => 'https://github.com/a/x', :tag => 'main'
mod 'a-x', :git => 'https://github.com/a/x', :tag => '1.0.0'
";
        let parsed = parse_puppetfile(content);
        assert!(parsed.manifest.contains("a-x"));
        assert!(parsed.invalid_tags.is_empty());
    }

    #[test]
    fn test_empty_content() {
        let parsed = parse_puppetfile("");
        assert!(parsed.manifest.is_empty());
        assert!(parsed.invalid_tags.is_empty());
    }
}
