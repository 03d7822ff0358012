//! Display-side role gating.
//!
//! Decides which dashboard sections, actions and rows to present for a
//! viewer. None of this is enforcement: the API rejects what it must.

use crate::domain::model::{Appointment, Identity, Quote, Role, SparePart, SupportRequest};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Appointments,
    Quotes,
    SupportRequests,
    SpareParts,
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::Appointments => "Appointments",
            Section::Quotes => "Quotes",
            Section::SupportRequests => "Support Requests",
            Section::SpareParts => "Spare Parts",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    CreateAppointment,
    ManageAppointments,
    CreateSupportRequest,
    ManageSupportRequests,
    ManageQuotes,
    ManageSpareParts,
    AddSpareParts,
}

impl Capability {
    pub const ALL: [Capability; 7] = [
        Capability::CreateAppointment,
        Capability::ManageAppointments,
        Capability::CreateSupportRequest,
        Capability::ManageSupportRequests,
        Capability::ManageQuotes,
        Capability::ManageSpareParts,
        Capability::AddSpareParts,
    ];

    /// Phrase used in "Your role cannot ..." messages.
    pub fn action(&self) -> &'static str {
        match self {
            Capability::CreateAppointment => "book appointments",
            Capability::ManageAppointments => "manage appointments",
            Capability::CreateSupportRequest => "file support requests",
            Capability::ManageSupportRequests => "edit or delete support requests",
            Capability::ManageQuotes => "create, edit or delete quotes",
            Capability::ManageSpareParts => "edit or delete spare parts",
            Capability::AddSpareParts => "add spare parts",
        }
    }

    fn roles(&self) -> &'static [Role] {
        match self {
            Capability::CreateAppointment => &[Role::Admin, Role::Customer],
            Capability::ManageAppointments | Capability::AddSpareParts => &[Role::Admin],
            Capability::CreateSupportRequest => &[Role::Admin, Role::Technician, Role::Customer],
            Capability::ManageSupportRequests
            | Capability::ManageQuotes
            | Capability::ManageSpareParts => &[Role::Admin, Role::Technician],
        }
    }
}

/// Dashboard menu, in display order.
pub fn sections_for(role: Option<&Role>) -> &'static [Section] {
    match role {
        Some(Role::Admin) => &[
            Section::Appointments,
            Section::Quotes,
            Section::SupportRequests,
            Section::SpareParts,
        ],
        Some(Role::Technician) => &[
            Section::SupportRequests,
            Section::SpareParts,
            Section::Quotes,
        ],
        Some(Role::Customer) => &[
            Section::Appointments,
            Section::SupportRequests,
            Section::Quotes,
        ],
        Some(Role::Other(_)) | None => &[],
    }
}

pub fn can(identity: &Identity, capability: Capability) -> bool {
    identity.has_role(capability.roles())
}

pub fn capabilities(identity: &Identity) -> Vec<Capability> {
    Capability::ALL
        .into_iter()
        .filter(|capability| can(identity, *capability))
        .collect()
}

pub fn visible_appointments(identity: &Identity, rows: Vec<Appointment>) -> Vec<Appointment> {
    match identity.role {
        Some(Role::Admin) => rows,
        Some(Role::Customer) => rows
            .into_iter()
            .filter(|row| identity.owns(&row.user_id))
            .collect(),
        _ => Vec::new(),
    }
}

pub fn visible_support_requests(
    identity: &Identity,
    rows: Vec<SupportRequest>,
) -> Vec<SupportRequest> {
    match identity.role {
        Some(Role::Customer) => rows
            .into_iter()
            .filter(|row| identity.owns(&row.user_id))
            .collect(),
        _ => rows,
    }
}

/// `visible_requests` must already be filtered for the same viewer.
pub fn visible_quotes(
    identity: &Identity,
    quotes: Vec<Quote>,
    visible_requests: &[SupportRequest],
) -> Vec<Quote> {
    match identity.role {
        Some(Role::Customer) => {
            let own: HashSet<i64> = visible_requests
                .iter()
                .map(|request| request.support_request_id)
                .collect();
            quotes
                .into_iter()
                .filter(|quote| own.contains(&quote.support_request_id))
                .collect()
        }
        _ => quotes,
    }
}

pub fn visible_spare_parts(_identity: &Identity, rows: Vec<SparePart>) -> Vec<SparePart> {
    rows
}
