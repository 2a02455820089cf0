use std::sync::Arc;

use chrono::{Duration, Utc};

use super::common::*;
use crate::models::candidate::{
    CandidateQuery, CandidateStatus, CreateCandidateRequest, UpdateCandidateRequest,
};
use crate::models::interview::{ConfirmInterviewRequest, MarkInterviewResultRequest};
use crate::models::interviewer::{CreateInterviewerRequest, InterviewerQuery};
use crate::models::organisation::{
    CreateOrganisationRequest, OrganisationQuery, UpdateOrganisationRequest, VerificationStatus,
};
use crate::repository::Stores;
use crate::services::candidate::CandidateService;
use crate::services::dashboard::DashboardService;
use crate::services::interviewer::InterviewerService;
use crate::services::organisation::OrganisationService;
use crate::services::ServiceError;

fn candidate_request(email: &str, position: &str) -> CreateCandidateRequest {
    CreateCandidateRequest {
        first_name: "Alan".to_string(),
        last_name: "Turing".to_string(),
        email: email.to_string(),
        phone: Some("+44 20 7946 0958".to_string()),
        position: Some(position.to_string()),
        experience_years: Some(3),
        skills: vec!["cryptanalysis".to_string()],
        resume_url: None,
        linkedin_url: None,
        github_url: Some("https://github.com/aturing".to_string()),
        organisation_id: None,
        user_id: None,
    }
}

fn organisation_request(name: &str, email: &str) -> CreateOrganisationRequest {
    CreateOrganisationRequest {
        name: name.to_string(),
        registration_number: Some("REG-001".to_string()),
        address: None,
        contact_email: email.to_string(),
        contact_phone: None,
        website: Some("https://acme.example.com".to_string()),
        description: None,
        admin_user_id: None,
    }
}

#[tokio::test]
async fn candidate_emails_are_unique_case_insensitively() {
    let service = CandidateService::new(Stores::in_memory());
    let created = service
        .create(candidate_request("alan@example.com", "Cryptographer"))
        .await
        .expect("create");
    assert_eq!(created.status, CandidateStatus::Applied);
    assert_eq!(created.full_name, "Alan Turing");

    let duplicate = service
        .create(candidate_request("ALAN@example.com", "Analyst"))
        .await;
    assert!(matches!(duplicate, Err(ServiceError::AlreadyExists(_))));
}

#[tokio::test]
async fn candidate_search_matches_name_email_and_position() {
    let service = CandidateService::new(Stores::in_memory());
    service
        .create(candidate_request("alan@example.com", "Cryptographer"))
        .await
        .unwrap();
    service
        .create(candidate_request("joan@example.com", "Site Reliability Engineer"))
        .await
        .unwrap();

    let found = service
        .list(CandidateQuery {
            search: Some("reliability".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.total_elements, 1);
    assert_eq!(found.content[0].email, "joan@example.com");

    let everyone = service
        .list(CandidateQuery {
            search: Some("turing".to_string()),
            status: Some(CandidateStatus::Applied),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(everyone.total_elements, 2);
}

#[tokio::test]
async fn candidate_update_checks_new_email() {
    let service = CandidateService::new(Stores::in_memory());
    let alan = service
        .create(candidate_request("alan@example.com", "Cryptographer"))
        .await
        .unwrap();
    service
        .create(candidate_request("joan@example.com", "SRE"))
        .await
        .unwrap();

    let clash = service
        .update(
            &alan.id,
            UpdateCandidateRequest {
                email: Some("joan@example.com".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(clash, Err(ServiceError::AlreadyExists(_))));

    let moved = service
        .update(
            &alan.id,
            UpdateCandidateRequest {
                status: Some(CandidateStatus::Interviewing),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.status, CandidateStatus::Interviewing);
    assert_eq!(moved.email, "alan@example.com");

    service.delete(&alan.id).await.unwrap();
    assert!(matches!(
        service.delete(&alan.id).await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn invalid_candidate_phone_fails_validation() {
    let service = CandidateService::new(Stores::in_memory());
    let mut request = candidate_request("alan@example.com", "Cryptographer");
    request.phone = Some("call me maybe".to_string());
    assert!(matches!(
        service.create(request).await,
        Err(ServiceError::Validation(_))
    ));
}

#[tokio::test]
async fn interviewer_linked_user_must_exist() {
    let service = InterviewerService::new(Stores::in_memory());
    let request = CreateInterviewerRequest {
        user_id: Some("ghost".to_string()),
        organisation_id: None,
        first_name: "Edsger".to_string(),
        last_name: "Dijkstra".to_string(),
        email: "edsger@example.com".to_string(),
        phone: None,
        department: None,
        designation: None,
        expertise: vec!["algorithms".to_string()],
        years_of_experience: Some(30),
        is_available: None,
    };
    assert!(matches!(
        service.create(request.clone()).await,
        Err(ServiceError::NotFound(_))
    ));

    let created = service
        .create(CreateInterviewerRequest {
            user_id: None,
            ..request.clone()
        })
        .await
        .expect("create");
    assert!(created.is_available);
    assert_eq!(created.total_interviews, 0);

    let duplicate = service
        .create(CreateInterviewerRequest {
            user_id: None,
            ..request
        })
        .await;
    assert!(matches!(duplicate, Err(ServiceError::AlreadyExists(_))));
}

#[tokio::test]
async fn interviewers_filter_by_expertise_and_availability() {
    let stores = Stores::in_memory();
    seed_interviewer(&stores, "grace@example.com").await;
    let busy = seed_interviewer(&stores, "linus@example.com").await;
    let mut busy = stores.interviewers.get(&busy.id).await.unwrap().unwrap();
    busy.is_available = false;
    stores.interviewers.update(busy).await.unwrap();
    let service = InterviewerService::new(stores);

    let rust_and_free = service
        .list(InterviewerQuery {
            expertise: Some("rust".to_string()),
            available: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(rust_and_free.total_elements, 1);
    assert_eq!(rust_and_free.content[0].email, "grace@example.com");
}

#[tokio::test]
async fn organisations_start_pending_and_move_through_verification() {
    let stores = Stores::in_memory();
    let notifier = Arc::new(RecordingNotifier::default());
    let service = OrganisationService::new(stores.clone(), notifier.clone());

    let created = service
        .create(organisation_request("Acme", "hr@acme.example.com"))
        .await
        .expect("create");
    assert_eq!(created.verification_status, VerificationStatus::Pending);
    assert!(!created.is_active);

    let verified = service.verify(&created.id).await.expect("verify");
    assert_eq!(verified.verification_status, VerificationStatus::Verified);
    assert!(verified.is_active);
    assert!(verified.verified_at.is_some());

    let rejected = service
        .reject(&created.id, Some("Registration number invalid".to_string()))
        .await
        .expect("reject");
    assert_eq!(rejected.verification_status, VerificationStatus::Rejected);
    assert!(!rejected.is_active);

    assert_eq!(
        notifier.sent(),
        vec![
            Sent::Verification(created.id.clone(), None),
            Sent::Verification(
                created.id.clone(),
                Some("Registration number invalid".to_string())
            ),
        ]
    );

    let pending = service
        .list(OrganisationQuery {
            status: Some(VerificationStatus::Pending),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(pending.total_elements, 0);
}

#[tokio::test]
async fn organisation_name_and_contact_are_unique() {
    let service = OrganisationService::new(
        Stores::in_memory(),
        Arc::new(RecordingNotifier::default()),
    );
    let acme = service
        .create(organisation_request("Acme", "hr@acme.example.com"))
        .await
        .unwrap();
    assert!(matches!(
        service
            .create(organisation_request("Acme", "jobs@acme.example.com"))
            .await,
        Err(ServiceError::AlreadyExists(_))
    ));
    assert!(matches!(
        service
            .create(organisation_request("Acme Labs", "HR@acme.example.com"))
            .await,
        Err(ServiceError::AlreadyExists(_))
    ));

    let globex = service
        .create(organisation_request("Globex", "hr@globex.example.com"))
        .await
        .unwrap();
    let renamed = service
        .update(
            &globex.id,
            UpdateOrganisationRequest {
                name: Some("Acme".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(renamed, Err(ServiceError::AlreadyExists(_))));

    service.delete(&acme.id).await.unwrap();
}

#[tokio::test]
async fn dashboards_count_upcoming_and_pending_work() {
    let (stores, service, _, interview) = scheduled().await;
    let candidate_id = interview.candidate_id.clone();
    let interviewer_id = interview.interviewer_ids[0].clone();

    let mut tomorrow = schedule_request(&candidate_id, &[&interviewer_id]);
    tomorrow.scheduled_at = Utc::now() + Duration::days(1);
    let tomorrow = service.schedule(tomorrow).await.unwrap();
    service
        .confirm(
            &tomorrow.id,
            ConfirmInterviewRequest {
                confirmed: true,
                notes: None,
            },
        )
        .await
        .unwrap();

    service
        .mark_result(
            &interview.id,
            MarkInterviewResultRequest {
                result: "SELECTED".to_string(),
                comments: None,
            },
        )
        .await
        .unwrap();
    service.request_feedback(&interview.id).await.unwrap();

    let dashboards = DashboardService::new(stores.clone());

    let candidate = dashboards.candidate(&candidate_id).await.unwrap();
    assert_eq!(candidate.total_interviews, 2);
    assert_eq!(candidate.upcoming_interviews, 1);
    assert_eq!(candidate.completed_interviews, 1);
    assert_eq!(candidate.awaiting_confirmation, 0);
    assert_eq!(candidate.next_interviews[0].id, tomorrow.id);

    let interviewer = dashboards.interviewer(&interviewer_id).await.unwrap();
    assert_eq!(interviewer.pending_feedback, 1);

    let admin = dashboards.admin().await.unwrap();
    assert_eq!(admin.total_interviews, 2);
    assert_eq!(admin.upcoming_interviews, 1);
    assert_eq!(admin.completed_interviews, 1);
    assert_eq!(admin.total_candidates, 1);

    assert!(matches!(
        dashboards.organisation("missing").await,
        Err(ServiceError::NotFound(_))
    ));
}
