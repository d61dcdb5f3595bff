//! Convenience macros for the shield.

/// Macro for creating a list of permission names.
///
/// # Examples
///
/// ```rust
/// use role_shield::permissions;
///
/// let perms = permissions!["edit", "view", "publish"];
/// assert_eq!(perms, vec!["edit".to_string(), "view".to_string(), "publish".to_string()]);
/// ```
#[macro_export]
macro_rules! permissions {
    ($($permission:expr),* $(,)?) => {
        {
            let permissions: ::std::vec::Vec<::std::string::String> =
                vec![$(::std::string::String::from($permission)),*];
            permissions
        }
    };
}

/// Macro for creating a role with permissions in a single expression.
///
/// # Examples
///
/// ```rust
/// use role_shield::{role, AuthorizableRole};
///
/// let editor = role! {
///     id: 2,
///     name: "editor",
///     description: "Content editor role",
///     permissions: ["edit", "view"]
/// };
///
/// assert_eq!(editor.permissions().len(), 2);
/// ```
#[macro_export]
macro_rules! role {
    (
        id: $id:expr,
        name: $name:expr,
        description: $desc:expr,
        permissions: [$($permission:expr),* $(,)?] $(,)?
    ) => {
        $crate::role::Role::with_id($id, $name)
            .with_description($desc)
            .add_permissions($crate::permissions![$($permission),*])
    };
    (
        id: $id:expr,
        name: $name:expr,
        permissions: [$($permission:expr),* $(,)?] $(,)?
    ) => {
        $crate::role::Role::with_id($id, $name)
            .add_permissions($crate::permissions![$($permission),*])
    };
}

/// Macro for creating a user holding roles and direct permissions.
///
/// # Examples
///
/// ```rust
/// use role_shield::{role, user};
///
/// let alice = user! {
///     id: "alice",
///     roles: [role! { id: 1, name: "admin", permissions: ["root"] }],
///     permissions: ["export"]
/// };
///
/// assert_eq!(alice.id().to_string(), "alice");
/// ```
#[macro_export]
macro_rules! user {
    (
        id: $id:expr,
        roles: [$($role:expr),* $(,)?],
        permissions: [$($permission:expr),* $(,)?] $(,)?
    ) => {
        {
            let user = $crate::user::User::new($id);
            $(
                let user = user.with_role($role);
            )*
            $(
                let user = user.with_permission($permission);
            )*
            user
        }
    };
}
