use serde::{Deserialize, Serialize};

/// Applicant and job details collected from the form on submission.
///
/// Every field must be present in the request body; content is not validated.
/// The record is immutable once deserialized and is passed by reference into
/// the prompt builder and every template renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub applicant_name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub job_title: String,
    pub company: String,
    /// Hiring manager or recruiter name. May be empty.
    pub recruiter: String,
    pub company_address: String,
    /// Free text.
    pub experience: String,
    /// Free text.
    pub skills: String,
}

impl ApplicationRecord {
    /// `address | phone | email`, shared by the Minimal and Modern layouts.
    pub fn contact_line(&self) -> String {
        format!("{} | {} | {}", self.address, self.phone, self.email)
    }
}

#[cfg(test)]
pub(crate) fn sample_record() -> ApplicationRecord {
    ApplicationRecord {
        applicant_name: "Priya Verma".to_string(),
        address: "123 Main St, Springfield, IL 62704".to_string(),
        phone: "+1 234 567 8900".to_string(),
        email: "priya@example.com".to_string(),
        job_title: "Data Analyst".to_string(),
        company: "Google".to_string(),
        recruiter: "Jordan Lee".to_string(),
        company_address: "1600 Amphitheatre Parkway, Mountain View, CA 94043".to_string(),
        experience: "Business Intelligence Intern working on SQL and Tableau".to_string(),
        skills: "Python, Excel, Power BI".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_requires_every_field() {
        let json = serde_json::json!({
            "applicant_name": "Priya Verma",
            "address": "123 Main St",
            "phone": "+1 234 567 8900",
            "email": "priya@example.com",
            "job_title": "Data Analyst",
            "company": "Google",
            "company_address": "1600 Amphitheatre Parkway",
            "experience": "SQL",
            "skills": "Python"
        });
        let result: Result<ApplicationRecord, _> = serde_json::from_value(json);
        assert!(result.is_err(), "record without recruiter must be rejected");
    }

    #[test]
    fn test_record_accepts_empty_strings() {
        let json = serde_json::json!({
            "applicant_name": "",
            "address": "",
            "phone": "",
            "email": "",
            "job_title": "",
            "company": "",
            "recruiter": "",
            "company_address": "",
            "experience": "",
            "skills": ""
        });
        let record: ApplicationRecord = serde_json::from_value(json).unwrap();
        assert!(record.recruiter.is_empty());
    }

    #[test]
    fn test_contact_line() {
        let record = sample_record();
        assert_eq!(
            record.contact_line(),
            "123 Main St, Springfield, IL 62704 | +1 234 567 8900 | priya@example.com"
        );
    }
}
