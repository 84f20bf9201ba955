use url::Url;

use crate::models::page::{Contact, CreatePageRequest, NewPage, VideoEntry, VIDEOS_PER_PAGE};

/// Checks a creation payload and resolves its contact block.
///
/// Collects every problem instead of stopping at the first one, so a client
/// can fix its payload in one round trip.
pub fn validate_create_request(
    request: CreatePageRequest,
    default_contact: Option<&Contact>,
) -> Result<NewPage, Vec<String>> {
    let mut problems = Vec::new();

    require_text(&mut problems, "recruiter.name", &request.recruiter.name);
    require_text(&mut problems, "recruiter.company", &request.recruiter.company);

    if request.videos.len() != VIDEOS_PER_PAGE {
        problems.push(format!(
            "videos must contain exactly {VIDEOS_PER_PAGE} entries, got {}",
            request.videos.len()
        ));
    }
    for (i, video) in request.videos.iter().enumerate() {
        validate_video(&mut problems, i, video);
    }

    let contact = match request.contact.or_else(|| default_contact.cloned()) {
        Some(contact) => {
            validate_contact(&mut problems, &contact);
            Some(contact)
        }
        None => {
            problems.push("contact is required (no default contact is configured)".to_string());
            None
        }
    };

    match contact {
        Some(contact) if problems.is_empty() => Ok(NewPage {
            recruiter: request.recruiter,
            videos: request.videos,
            contact,
        }),
        _ => Err(problems),
    }
}

fn validate_video(problems: &mut Vec<String>, index: usize, video: &VideoEntry) {
    require_text(problems, &format!("videos[{index}].title"), &video.title);
    require_http_url(problems, &format!("videos[{index}].loomUrl"), &video.loom_url);
}

fn validate_contact(problems: &mut Vec<String>, contact: &Contact) {
    if !contact.email.contains('@') {
        problems.push(format!(
            "contact.email '{}' is not an email address",
            contact.email
        ));
    }
    require_http_url(problems, "contact.linkedin", &contact.linkedin);
    // May be a site-relative path such as /resume.pdf.
    require_text(problems, "contact.resumeUrl", &contact.resume_url);
}

fn require_text(problems: &mut Vec<String>, field: &str, value: &str) {
    if value.trim().is_empty() {
        problems.push(format!("{field} cannot be empty"));
    }
}

fn require_http_url(problems: &mut Vec<String>, field: &str, value: &str) {
    if value.trim().is_empty() {
        problems.push(format!("{field} cannot be empty"));
        return;
    }
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => problems.push(format!("{field} '{value}' is not an http(s) URL")),
    }
}
