//! Security-focused tests for the shield.
//! These tests ensure state never leaks between users and that privileged
//! checks fail closed.

use role_shield::{
    identifier::Identifier,
    provider::{MemoryUserProvider, UserProvider},
    resource::Resource,
    role::{AuthorizableRole, Role},
    shield::{Shield, ShieldConfig},
    user::{Authenticatable, User},
    Error, Result,
};
use std::{sync::Arc, thread};

fn new_shield() -> Shield<MemoryUserProvider<User>> {
    Shield::new(MemoryUserProvider::new())
}

#[test]
fn test_no_leak_between_users() {
    let mut shield = new_shield();
    shield.set_user(Arc::new(
        User::new("admin")
            .with_role(Role::with_id(1, "Admin").add_permission("root"))
            .with_permission("billing"),
    ));
    assert!(shield.is_super_user());

    shield.set_user(Arc::new(
        User::new("intern").with_role(Role::with_id(3, "Viewer").add_permission("view")),
    ));

    assert!(!shield.is_super_user());
    assert!(shield.cannot("billing"));
    assert!(!shield.has_role(1));
    assert_eq!(shield.roles(), vec![Identifier::Int(3)]);
    assert_eq!(shield.permissions(), vec!["view"]);
    assert!(shield.attached_roles().iter().all(|id| id == &Identifier::Int(3)));
}

#[test]
fn test_logout_fails_closed() {
    let mut shield = new_shield();
    shield.set_user(Arc::new(
        User::new(1).with_role(Role::with_id(1, "Admin").add_permission("root")),
    ));
    shield.logout();

    assert!(shield.cannot("anything"));
    assert!(!shield.is_super_user());
    assert!(matches!(
        shield.is_owner(&Resource::new("doc", "document", 1)),
        Err(Error::Unauthenticated(_))
    ));
    assert!(matches!(
        shield.attach_role(Arc::new(Role::with_id(1, "Admin").add_permission("root"))),
        Err(Error::Unauthenticated(_))
    ));
    assert!(shield.cannot("anything"));
}

#[test]
fn test_super_user_needs_exact_permission() {
    let mut shield = new_shield();
    shield.set_user(Arc::new(
        User::new(1)
            .with_permission("Root")
            .with_permission("root ")
            .with_permission("*"),
    ));

    assert!(!shield.is_super_user());
    assert!(shield.cannot("delete"));
}

#[test]
fn test_super_user_survives_partial_detach() {
    let mut shield = new_shield();
    shield.set_user(Arc::new(
        User::new(1)
            .with_role(Role::with_id(1, "Admin").add_permission("root"))
            .with_role(Role::with_id(2, "Ops").add_permissions(["root", "deploy"])),
    ));

    shield.detach_role(1);
    assert!(shield.is_super_user());

    shield.detach_role(2);
    assert!(!shield.is_super_user());
    assert!(shield.cannot("deploy"));
}

#[test]
fn test_revoking_direct_root_keeps_role_root() {
    let mut shield = new_shield();
    shield.set_user(Arc::new(
        User::new(1)
            .with_permission("root")
            .with_role(Role::with_id(1, "Admin").add_permission("root")),
    ));

    assert!(shield.revoke_direct_permission("root"));
    assert!(shield.is_super_user());

    assert!(shield.remove_permission("root", None));
    assert!(!shield.is_super_user());
}

#[test]
fn test_ownership_is_exact() {
    let mut shield = new_shield();
    shield.set_user(Arc::new(User::new(12)));

    assert!(shield.is_owner(&Resource::new("a", "doc", "12")).unwrap());
    assert!(!shield.is_owner(&Resource::new("b", "doc", "012")).unwrap());
    assert!(!shield.is_owner(&Resource::new("c", "doc", 121)).unwrap());
    assert!(!shield.is_owner(&Resource::new("d", "doc", "12 ")).unwrap());
}

#[test]
fn test_removed_user_is_not_restored() {
    let provider = MemoryUserProvider::new();
    provider.store_user(User::new(5).with_permission("edit"));

    let mut shield = Shield::new(provider.clone());
    provider.remove_user(&Identifier::from(5));
    shield.restore_session(5);

    assert!(shield.user().unwrap().is_none());
    assert!(shield.cannot("edit"));
}

#[test]
fn test_provider_failure_is_reported() {
    #[derive(Debug)]
    struct Failing;

    impl UserProvider for Failing {
        type User = User;

        fn retrieve_by_id(&self, id: &Identifier) -> Result<Option<Arc<User>>> {
            Err(Error::Provider(format!("lookup of '{id}' timed out")))
        }
    }

    let mut shield = Shield::new(Failing);
    shield.restore_session(1);

    assert!(matches!(shield.user(), Err(Error::Provider(_))));
    assert!(matches!(shield.login_using_id(1), Err(Error::Provider(_))));
    assert!(!shield.is_resolved());
}

#[test]
fn test_sessions_on_separate_threads() {
    let provider = MemoryUserProvider::new();
    let editor: Arc<dyn AuthorizableRole> =
        Arc::new(Role::with_id(2, "Editor").add_permission("edit"));
    for id in 0..8 {
        provider.store_user(User::new(id).with_shared_role(Arc::clone(&editor)));
    }

    let handles: Vec<_> = (0..8)
        .map(|id| {
            let provider = provider.clone();
            thread::spawn(move || {
                let mut shield = Shield::new(provider);
                shield.login_using_id(id).unwrap();
                if id % 2 == 0 {
                    shield.detach_role(2);
                }
                shield.can("edit")
            })
        })
        .collect();

    for (id, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), id % 2 == 1);
    }
}

#[test]
fn test_retained_detach_does_not_grant() {
    let config = ShieldConfig {
        retain_detached_roles: true,
        ..ShieldConfig::default()
    };
    let mut shield = Shield::with_config(MemoryUserProvider::<User>::new(), config);
    shield.set_user(Arc::new(
        User::new(1).with_role(Role::with_id(2, "Editor").add_permission("edit")),
    ));

    shield.detach_role(2);

    // Still attached, but no longer resolved or granting.
    assert!(shield.is_attached(2));
    assert!(!shield.has_role(2));
    assert!(shield.cannot("edit"));
    assert_eq!(
        shield.get_resolved_role(2).map(|role| role.identifier()),
        None
    );
    assert_eq!(shield.id(), Some(User::new(1).auth_identifier()));
}
