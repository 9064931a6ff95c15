//! Pairs ranked jobs with recruiter contacts by company.

use std::collections::HashMap;

use serde::Serialize;

use crate::jobs::models::CondensedJob;
use crate::outreach::models::Recruiter;

/// Trailing words that do not distinguish one company from another.
const LEGAL_SUFFIXES: &[&str] = &[
    "inc", "incorporated", "llc", "ltd", "limited", "corp", "corporation", "co", "company",
    "plc", "gmbh",
];

#[derive(Debug, Clone, Serialize)]
pub struct JobRecruiterMatch {
    pub job: CondensedJob,
    pub recruiters: Vec<Recruiter>,
}

/// Lowercases, drops punctuation and strips trailing legal suffixes.
///
/// `"Acme, Inc."` and `"ACME"` both normalize to `"acme"`.
pub fn normalize_company(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .flat_map(|c| {
            let keep = c.is_alphanumeric();
            c.to_lowercase().map(move |l| if keep { l } else { ' ' })
        })
        .collect();
    let mut words: Vec<&str> = cleaned.split_whitespace().collect();
    while words.len() > 1 && words.last().is_some_and(|w| LEGAL_SUFFIXES.contains(w)) {
        words.pop();
    }
    words.join(" ")
}

/// Matches each job, in the given (ranked) order, to the recruiters at its
/// company. Jobs without a recruiter are kept with an empty list.
pub fn match_recruiters(jobs: &[CondensedJob], recruiters: &[Recruiter]) -> Vec<JobRecruiterMatch> {
    let mut by_company: HashMap<String, Vec<&Recruiter>> = HashMap::new();
    for recruiter in recruiters {
        by_company
            .entry(normalize_company(&recruiter.company))
            .or_default()
            .push(recruiter);
    }

    jobs.iter()
        .map(|job| JobRecruiterMatch {
            job: job.clone(),
            recruiters: by_company
                .get(&normalize_company(&job.posting.company))
                .map(|found| found.iter().map(|r| (*r).clone()).collect())
                .unwrap_or_default(),
        })
        .collect()
}
