use planboard_utils::join_non_empty;
use serde::Deserialize;
use serde_json::Value;

pub const USER_CREATED: &str = "clerk/user.created";
pub const USER_UPDATED: &str = "clerk/user.updated";
pub const USER_DELETED: &str = "clerk/user.deleted";
pub const ORGANIZATION_CREATED: &str = "clerk/organization.created";
pub const ORGANIZATION_UPDATED: &str = "clerk/organization.updated";
pub const ORGANIZATION_DELETED: &str = "clerk/organization.deleted";
pub const ORGANIZATION_INVITATION_ACCEPTED: &str = "clerk/organizationInvitation.accepted";

/// Wire envelope of an identity-provider event as published on the bus
#[derive(Debug, Clone, Deserialize)]
pub struct EventEnvelope {
  #[serde(default)]
  pub id: Option<String>,
  pub name: String,
  #[serde(default)]
  pub data: Value,
  /// Emission time in unix millis
  #[serde(default)]
  pub ts: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailAddress {
  pub email_address: String,
}

/// Payload of `user.created` and `user.updated`
#[derive(Debug, Clone, Deserialize)]
pub struct UserEventData {
  pub id: String,
  #[serde(default)]
  pub email_addresses: Vec<EmailAddress>,
  #[serde(default)]
  pub first_name: Option<String>,
  #[serde(default)]
  pub last_name: Option<String>,
  #[serde(default)]
  pub image_url: Option<String>,
}

impl UserEventData {
  /// The first listed address, which the provider treats as primary
  pub fn primary_email(&self) -> Option<&str> {
    self.email_addresses.first().map(|e| e.email_address.as_str())
  }

  /// First and last name joined by a space, missing or empty parts dropped
  pub fn display_name(&self) -> String {
    join_non_empty([self.first_name.as_deref(), self.last_name.as_deref()], " ")
  }
}

/// Payload of the `*.deleted` events
#[derive(Debug, Clone, Deserialize)]
pub struct DeletedObjectData {
  pub id: String,
}

/// Payload of `organization.created` and `organization.updated`
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationEventData {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub slug: Option<String>,
  #[serde(default)]
  pub image_url: Option<String>,
  #[serde(default)]
  pub created_by: Option<String>,
}

impl OrganizationEventData {
  /// The creating user, if the event names one
  pub fn creator_id(&self) -> Option<&str> {
    self.created_by.as_deref().filter(|id| !id.is_empty())
  }
}

/// Payload of `organizationInvitation.accepted`
#[derive(Debug, Clone, Deserialize)]
pub struct InvitationAcceptedData {
  pub user_id: String,
  pub organization_id: String,
  pub role_name: String,
}

#[derive(Debug, Clone)]
pub enum IdentityEvent {
  UserCreated(UserEventData),
  UserUpdated(UserEventData),
  UserDeleted(DeletedObjectData),
  OrganizationCreated(OrganizationEventData),
  OrganizationUpdated(OrganizationEventData),
  OrganizationDeleted(DeletedObjectData),
  OrganizationInvitationAccepted(InvitationAcceptedData),
}

impl IdentityEvent {
  /// Decode the envelope's payload according to its name. Unknown names
  /// yield `Ok(None)`.
  pub fn from_envelope(envelope: &EventEnvelope) -> Result<Option<IdentityEvent>, serde_json::Error> {
    let data = envelope.data.clone();

    let event = match envelope.name.as_str() {
      USER_CREATED => IdentityEvent::UserCreated(serde_json::from_value(data)?),
      USER_UPDATED => IdentityEvent::UserUpdated(serde_json::from_value(data)?),
      USER_DELETED => IdentityEvent::UserDeleted(serde_json::from_value(data)?),
      ORGANIZATION_CREATED => IdentityEvent::OrganizationCreated(serde_json::from_value(data)?),
      ORGANIZATION_UPDATED => IdentityEvent::OrganizationUpdated(serde_json::from_value(data)?),
      ORGANIZATION_DELETED => IdentityEvent::OrganizationDeleted(serde_json::from_value(data)?),
      ORGANIZATION_INVITATION_ACCEPTED => {
        IdentityEvent::OrganizationInvitationAccepted(serde_json::from_value(data)?)
      }
      _ => return Ok(None),
    };

    Ok(Some(event))
  }

  pub fn name(&self) -> &'static str {
    match self {
      IdentityEvent::UserCreated(_) => USER_CREATED,
      IdentityEvent::UserUpdated(_) => USER_UPDATED,
      IdentityEvent::UserDeleted(_) => USER_DELETED,
      IdentityEvent::OrganizationCreated(_) => ORGANIZATION_CREATED,
      IdentityEvent::OrganizationUpdated(_) => ORGANIZATION_UPDATED,
      IdentityEvent::OrganizationDeleted(_) => ORGANIZATION_DELETED,
      IdentityEvent::OrganizationInvitationAccepted(_) => ORGANIZATION_INVITATION_ACCEPTED,
    }
  }
}
