//! Keyword and pattern based categorisation.
//!
//! `Classifier` is a pure function over `(title, summary, url)`: no I/O, no
//! state, and the result does not depend on the order articles are seen in.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use sn_core::Category;
use url::Url;

/// Hosts that only publish vulnerability material.
const VULNERABILITY_HOSTS: &[&str] = &[
    "nvd.nist.gov",
    "cve.mitre.org",
    "exploit-db.com",
    "packetstormsecurity.com",
    "seclists.org",
    "vuldb.com",
];

/// Any of these in a title settles the question.
const TITLE_KEYWORDS: &[&str] = &[
    "vulnerability",
    "exploit",
    "zero-day",
    "0-day",
    "patch",
    "security update",
    "cve",
    "rce",
    "sql injection",
    "xss",
    "buffer overflow",
];

const VULNERABILITY_PATTERNS: &[&str] = &[
    r"CVE-\d{4}-\d{4,}",
    r"zero[- ]?day",
    r"0[- ]?day",
    r"\bRCE\b",
    r"remote code execution",
    r"privilege escalation",
    r"buffer overflow",
    r"SQL injection",
    r"\bSQLi\b",
    r"cross[- ]?site scripting",
    r"\bXSS\b",
    r"\bCSRF\b",
    r"cross[- ]?site request forgery",
    r"security patch(?:es)?",
    r"security update(?:s)?",
    r"critical vulnerability",
    r"vulnerability disclosed",
    r"exploit(?:s|ed|able)?",
    r"proof[- ]?of[- ]?concept",
    r"\bPoC\b",
    r"authentication bypass",
    r"security flaw(?:s)?",
    r"security bug(?:s)?",
    r"patch(?:ed|es|ing)? vulnerability",
    r"fix(?:ed|es|ing)? vulnerability",
    r"vulnerability fix(?:ed|es)?",
    r"actively exploited",
    r"in[- ]?the[- ]?wild exploit",
    r"emergency patch",
    r"critical patch",
    r"security advisory",
    r"vulnerability report",
    r"CVSS score",
    r"attack vector",
    r"denial[- ]?of[- ]?service",
    r"\bDoS\b",
    r"\bDDoS\b",
    r"memory corruption",
    r"heap overflow",
    r"stack overflow",
    r"use[- ]?after[- ]?free",
    r"race condition",
    r"arbitrary code execution",
    r"local privilege escalation",
    r"\bLPE\b",
    r"sandbox escape",
    r"security bypass",
    r"information disclosure",
    r"data exposure",
    r"unauthorized access",
    r"security hole",
];

const GENERAL_PATTERNS: &[&str] = &[
    r"data breach(?:es)?",
    r"cyber ?attack",
    r"ransomware",
    r"malware",
    r"phishing",
    r"security trend",
    r"cybersecurity report",
    r"threat actor",
    r"APT\d+",
    r"security research",
    r"security tool",
    r"security framework",
    r"compliance",
    r"GDPR",
    r"security audit",
    r"penetration test",
    r"bug bounty",
    r"security conference",
    r"security training",
    r"cybercrime",
    r"dark ?web",
    r"security startup",
    r"acquisition",
    r"security funding",
    r"security policy",
    r"security strategy",
    r"incident response",
    r"threat intelligence",
    r"security operations",
    r"\bSOC\b",
    r"\bSIEM\b",
];

lazy_static! {
    static ref CVE_ID: Regex = RegexBuilder::new(r"CVE-\d{4}-\d{4,}")
        .case_insensitive(true)
        .build()
        .expect("valid regex");
    static ref VULNERABILITY: Regex = alternation(VULNERABILITY_PATTERNS);
    static ref GENERAL: Regex = alternation(GENERAL_PATTERNS);
}

fn alternation(patterns: &[&str]) -> Regex {
    RegexBuilder::new(&patterns.join("|"))
        .case_insensitive(true)
        .build()
        .expect("valid regex")
}

/// Share of pattern hits per category, both 0 when nothing matched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryScores {
    pub vulnerability: f64,
    pub general: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier;

impl Classifier {
    pub fn new() -> Self {
        Self
    }

    pub fn categorize(&self, title: &str, summary: Option<&str>, url: &str) -> Category {
        if is_vulnerability_host(url) {
            return Category::Vulnerability;
        }

        let summary = summary.unwrap_or_default();
        if CVE_ID.is_match(title) || CVE_ID.is_match(summary) {
            return Category::Vulnerability;
        }

        let lowered = title.to_lowercase();
        if TITLE_KEYWORDS.iter().any(|keyword| lowered.contains(keyword)) {
            return Category::Vulnerability;
        }

        let (vulnerability, general) = match_counts(title, summary);
        if vulnerability > 0 && vulnerability as f64 >= general as f64 * 1.5 {
            return Category::Vulnerability;
        }

        Category::General
    }

    pub fn scores(&self, title: &str, summary: Option<&str>) -> CategoryScores {
        let (vulnerability, general) = match_counts(title, summary.unwrap_or_default());
        let total = (vulnerability + general) as f64;
        if total == 0.0 {
            return CategoryScores { vulnerability: 0.0, general: 0.0 };
        }
        CategoryScores {
            vulnerability: vulnerability as f64 / total,
            general: general as f64 / total,
        }
    }
}

fn match_counts(title: &str, summary: &str) -> (usize, usize) {
    let text = format!("{} {}", title, summary);
    (VULNERABILITY.find_iter(&text).count(), GENERAL.find_iter(&text).count())
}

fn is_vulnerability_host(url: &str) -> bool {
    let Some(host) = Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_lowercase)) else {
        return false;
    };
    VULNERABILITY_HOSTS
        .iter()
        .any(|known| host == *known || host.ends_with(&format!(".{}", known)))
}
