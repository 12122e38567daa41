//! Activity kinds and the renderers for stored payloads, keyed by (event type, revision).
//!
//! `Activity` pairs every event type with the payload shape it stores, so an event can
//! only be recorded with a payload its renderer reads back. `EventType` is the
//! fieldless discriminant of `Activity` and is what the `activity_log` row stores.

use std::{collections::HashMap, str::FromStr, sync::LazyLock};

use strum::{AsRefStr, Display, EnumDiscriminants, EnumIter, EnumString};

use crate::server::activity::{
    event::{DivisionsStatusEvent, ExecutorEvent, NamesEvent, ProgramOrgUnitEvent, UpdatedEvent},
    ActivityError, ActivityEvent, ActivityItem, EventPayload, Executor,
};

/// Revision written for new events. Bump per event type when its payload shape changes
/// and register a decoder for the new revision next to the old one.
pub const CURRENT_REVISION: i32 = 1;

type Decoder = fn(&str) -> Result<Activity, serde_json::Error>;

macro_rules! activities {
    ($($variant:ident($payload:ty) => |$event:pat_param| $message:expr;)*) => {
        /// Recordable activity: the event type together with its payload.
        #[derive(Debug, Clone, PartialEq, EnumDiscriminants)]
        #[strum_discriminants(name(EventType))]
        #[strum_discriminants(derive(Hash, Display, EnumString, AsRefStr, EnumIter))]
        pub enum Activity {
            $($variant($payload),)*
        }

        impl ActivityEvent for Activity {
            fn event_type(&self) -> EventType {
                EventType::from(self)
            }

            fn executor(&self) -> &Executor {
                match self {
                    $(Self::$variant(event) => event.executor(),)*
                }
            }

            fn message(&self) -> String {
                match self {
                    $(Self::$variant($event) => $message,)*
                }
            }

            fn payload(&self) -> Result<String, serde_json::Error> {
                match self {
                    $(Self::$variant(event) => serde_json::to_string(event),)*
                }
            }
        }

        fn current_decoders() -> Vec<(EventType, Decoder)> {
            vec![
                $((
                    EventType::$variant,
                    (|p: &str| serde_json::from_str::<$payload>(p).map(Activity::$variant)) as Decoder,
                ),)*
            ]
        }
    };
}

activities! {
    UserCreated(ExecutorEvent) => |_| "User created".into();
    UserUpdated(UpdatedEvent) => |_| "User details updated".into();
    UserDeactivated(ExecutorEvent) => |_| "User deactivated".into();
    UserReactivated(ExecutorEvent) => |_| "User reactivated".into();
    UserRolesAssign(NamesEvent) => |e| format!("User has been assigned to the following roles: {}", e.names);
    UserRolesUnassign(NamesEvent) => |e| format!("User has been unassigned from the following roles: {}", e.names);
    TenantUpdated(UpdatedEvent) => |_| "Tenant details updated".into();
    TenantEnteredByAdmin(ExecutorEvent) => |_| "Super admin entered the tenant".into();
    TenantProgramsAssigned(NamesEvent) => |e| format!("Programs assigned: {}", e.names);
    TenantProgramsUnassigned(NamesEvent) => |e| format!("Programs unassigned: {}", e.names);
    TenantDivisionsStatusChanged(DivisionsStatusEvent) => |e| {
        if e.division_enabled {
            "Divisions turned on".into()
        } else {
            "Divisions turned off".into()
        }
    };
    DivisionUpdated(UpdatedEvent) => |_| "Division details updated".into();
    DepartmentUpdated(UpdatedEvent) => |_| "Department details updated".into();
    ServiceAreaUpdated(UpdatedEvent) => |_| "Service area details updated".into();
    JobTitleUpdated(UpdatedEvent) => |_| "Job title details updated".into();
    TeamUpdated(UpdatedEvent) => |_| "Team details updated".into();
    ProgramCreated(ExecutorEvent) => |_| "Program created".into();
    ProgramUpdated(UpdatedEvent) => |_| "Program details updated".into();
    ProgramDeactivated(ExecutorEvent) => |_| "Program deactivated".into();
    ProgramReactivated(ExecutorEvent) => |_| "Program reactivated".into();
    ProgramOrgUnitAssigned(ProgramOrgUnitEvent) => |e| format!(
        "Program assigned to department {} and service area {}",
        e.department, e.service_area
    );
    ProgramOrgUnitUnassigned(ProgramOrgUnitEvent) => |e| format!(
        "Program unassigned from department {} and service area {}",
        e.department, e.service_area
    );
    AccountCreated(ExecutorEvent) => |_| "Account created".into();
    AccountProfileUpdated(UpdatedEvent) => |_| "Account details updated".into();
    ClientDeactivated(ExecutorEvent) => |_| "Client deactivated".into();
    ClientReactivated(ExecutorEvent) => |_| "Client reactivated".into();
    ReferralDeactivated(ExecutorEvent) => |_| "Referral deactivated".into();
    ReferralReactivated(ExecutorEvent) => |_| "Referral reactivated".into();
    ContactCreated(ExecutorEvent) => |_| "Contact created".into();
    ContactUpdated(UpdatedEvent) => |_| "Contact details updated".into();
    ContactDeactivated(ExecutorEvent) => |_| "Contact deactivated".into();
    ContactReactivated(ExecutorEvent) => |_| "Contact reactivated".into();
    ContactAssignedToAccount(NamesEvent) => |e| format!("Contact assigned to the account: {}", e.names);
    ContactUnassociatedWithAccount(NamesEvent) => |e| format!("Contact unassociated with the account: {}", e.names);
    ContactLinkedToContact(NamesEvent) => |e| format!("Contact linked to the contact: {}", e.names);
    ContactUnlinkedFromContact(NamesEvent) => |e| format!("Contact unlinked from the contact: {}", e.names);
    EntityCreated(ExecutorEvent) => |_| "Entity created".into();
    EntityUpdated(UpdatedEvent) => |_| "Entity details updated".into();
    EntityDeactivated(ExecutorEvent) => |_| "Entity deactivated".into();
    EntityReactivated(ExecutorEvent) => |_| "Entity reactivated".into();
    EntityStateIdAdded(NamesEvent) => |e| format!("State ID(s) added: {}", e.names);
    EntityStateIdDeleted(NamesEvent) => |e| format!("State ID deleted: {}", e.names);
    EntityLocationsAssociated(NamesEvent) => |e| format!("Location(s) associated: {}", e.names);
    EntityLocationUnassociated(NamesEvent) => |e| format!("Location unassociated: {}", e.names);
    LocationCreated(ExecutorEvent) => |_| "Location created".into();
    LocationUpdated(UpdatedEvent) => |_| "Location details updated".into();
    LocationDeactivated(ExecutorEvent) => |_| "Location deactivated".into();
    LocationReactivated(ExecutorEvent) => |_| "Location reactivated".into();
    LocationEntitiesAssociated(NamesEvent) => |e| format!("Entity(ies) associated: {}", e.names);
}

static DECODERS: LazyLock<HashMap<(EventType, i32), Decoder>> = LazyLock::new(|| {
    current_decoders()
        .into_iter()
        .map(|(event_type, decoder)| ((event_type, CURRENT_REVISION), decoder))
        .collect()
});

impl Activity {
    /// Picks the reactivated or deactivated variant for a status change.
    pub fn status_change(
        active: bool,
        reactivated: fn(ExecutorEvent) -> Activity,
        deactivated: fn(ExecutorEvent) -> Activity,
        executor: Executor,
    ) -> Activity {
        let event = ExecutorEvent::new(executor);
        if active {
            reactivated(event)
        } else {
            deactivated(event)
        }
    }

    fn into_item(self) -> ActivityItem {
        let message = self.message();
        let executor = self.executor();

        ActivityItem {
            date: executor.date,
            full_name: executor.executor_full_name.clone(),
            message,
        }
    }
}

/// Reads a stored payload back into its activity.
///
/// # Returns
/// - `Ok(Activity)` - Payload decoded for the stored event type and revision
/// - `Err(ActivityError::UnknownEvent)` - Event type or revision has no decoder
/// - `Err(ActivityError::Payload)` - Payload does not match the registered shape
pub fn decode(event_type: &str, revision: i32, payload: &str) -> Result<Activity, ActivityError> {
    let unknown = || ActivityError::UnknownEvent {
        event_type: event_type.to_string(),
        revision,
    };

    let parsed = EventType::from_str(event_type).map_err(|_| unknown())?;
    let decoder = DECODERS.get(&(parsed, revision)).ok_or_else(unknown)?;

    decoder(payload).map_err(|source| ActivityError::Payload {
        event_type: event_type.to_string(),
        source,
    })
}

/// Renders a stored activity row.
pub fn render(event_type: &str, revision: i32, payload: &str) -> Result<ActivityItem, ActivityError> {
    decode(event_type, revision, payload).map(Activity::into_item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;
    use uuid::Uuid;

    fn executor() -> Executor {
        Executor::new(Uuid::new_v4(), "Jane Doe", "Admin".to_string())
    }

    fn stored(activity: &Activity) -> (String, String) {
        (
            activity.event_type().to_string(),
            activity.payload().unwrap(),
        )
    }

    #[test]
    fn renders_roles_assignment_message() {
        let event = NamesEvent::new(executor(), &["Admin", "User"]);
        let (event_type, payload) = stored(&Activity::UserRolesAssign(event.clone()));

        let item = render(&event_type, CURRENT_REVISION, &payload).unwrap();

        assert_eq!(event_type, "UserRolesAssign");
        assert_eq!(
            item.message,
            "User has been assigned to the following roles: Admin, User"
        );
        assert_eq!(item.full_name, "Jane Doe");
        assert_eq!(item.date, event.executor.date);
    }

    #[test]
    fn renders_division_toggle_both_ways() {
        for (enabled, expected) in [(true, "Divisions turned on"), (false, "Divisions turned off")] {
            let activity = Activity::TenantDivisionsStatusChanged(DivisionsStatusEvent {
                executor: executor(),
                division_enabled: enabled,
            });
            let (event_type, payload) = stored(&activity);

            let item = render(&event_type, CURRENT_REVISION, &payload).unwrap();

            assert_eq!(item.message, expected);
        }
    }

    #[test]
    fn status_change_picks_variant_by_state() {
        let reactivated = Activity::status_change(
            true,
            Activity::ContactReactivated,
            Activity::ContactDeactivated,
            executor(),
        );
        let deactivated = Activity::status_change(
            false,
            Activity::ContactReactivated,
            Activity::ContactDeactivated,
            executor(),
        );

        assert_eq!(reactivated.event_type(), EventType::ContactReactivated);
        assert_eq!(deactivated.event_type(), EventType::ContactDeactivated);
        assert_eq!(deactivated.message(), "Contact deactivated");
    }

    #[test]
    fn decodes_the_recorded_activity() {
        let activity = Activity::EntityStateIdAdded(NamesEvent::new(executor(), &["CA-1", "NY-2"]));
        let (event_type, payload) = stored(&activity);

        assert_eq!(decode(&event_type, CURRENT_REVISION, &payload).unwrap(), activity);
    }

    #[test]
    fn flattens_executor_into_payload() {
        let (_, payload) = stored(&Activity::UserCreated(ExecutorEvent::new(executor())));
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();

        assert_eq!(value["executorFullName"], "Jane Doe");
        assert_eq!(value["executorRoles"], "Admin");
    }

    #[test]
    fn rejects_unknown_event_type_and_revision() {
        let (_, payload) = stored(&Activity::UserCreated(ExecutorEvent::new(executor())));

        assert!(matches!(
            render("SomethingElse", 1, &payload),
            Err(ActivityError::UnknownEvent { .. })
        ));
        assert!(matches!(
            render("UserCreated", 2, &payload),
            Err(ActivityError::UnknownEvent { .. })
        ));
    }

    #[test]
    fn rejects_stored_payload_of_wrong_shape() {
        let (_, payload) = stored(&Activity::UserCreated(ExecutorEvent::new(executor())));

        assert!(matches!(
            render("ContactLinkedToContact", 1, &payload),
            Err(ActivityError::Payload { .. })
        ));
    }

    #[test]
    fn every_event_type_has_a_decoder() {
        for event_type in EventType::iter() {
            assert!(
                DECODERS.contains_key(&(event_type, CURRENT_REVISION)),
                "{} has no decoder",
                event_type
            );
        }
    }
}
