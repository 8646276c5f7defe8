use serde::{Deserialize, Serialize};

use super::{
    Field, RecordKind, Role, UserCreated, UserLoggedIn, UserUpdated, ValidationErrors, Validator,
    commands::{Login, SaveUser},
};

/// 利用者（名前が一意キー）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
}

/// ログイン中の利用者
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_name: String,
    pub role: Role,
}

impl Session {
    /// 画面上部に表示する挨拶
    pub fn welcome(&self) -> String {
        format!(
            "Welcome {} ({})",
            self.user_name,
            self.role.as_str().to_uppercase()
        )
    }
}

/// 純粋関数：ログインする
///
/// デモ用のゲートであり、登録済み利用者との照合は行わない。
/// 氏名・パスワードは必須。役割が未指定なら一般会員。
pub fn login(cmd: &Login) -> Result<(Session, UserLoggedIn), ValidationErrors> {
    let mut v = Validator::new();

    let name = v.required(Field::LoginName, &cmd.name, "Name is required");
    v.required(Field::LoginPassword, &cmd.password, "Password is required");
    let role = match cmd.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        None => Some(Role::default()),
        Some(raw) => match raw.parse::<Role>() {
            Ok(role) => Some(role),
            Err(_) => {
                v.push(Field::LoginRole, "Role must be member or admin");
                None
            }
        },
    };

    match (name, role) {
        (Some(name), Some(role)) if v.is_empty() => {
            let session = Session {
                user_name: name.to_string(),
                role,
            };
            let event = UserLoggedIn {
                name: session.user_name.clone(),
                role,
            };
            Ok((session, event))
        }
        _ => Err(v.into_errors()),
    }
}

/// 検証済みの利用者フォーム
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserForm {
    pub kind: RecordKind,
    pub name: String,
    pub password: String,
    pub role: Role,
}

/// 利用者フォームの検証
pub fn validate_user_form(cmd: &SaveUser) -> Result<UserForm, ValidationErrors> {
    let mut v = Validator::new();

    let kind = v.choice::<RecordKind>(
        Field::UserKind,
        cmd.kind.as_deref(),
        "Select new or existing",
        "Record type must be new or existing",
    );
    let name = v.required(Field::UserName, &cmd.name, "Name required");
    let password = v.required(Field::UserPassword, &cmd.password, "Password required");
    let role = v.choice::<Role>(
        Field::UserRole,
        cmd.role.as_deref(),
        "Select role",
        "Role must be member or admin",
    );

    match (kind, name, password, role) {
        (Some(kind), Some(name), Some(password), Some(role)) if v.is_empty() => Ok(UserForm {
            kind,
            name: name.to_string(),
            password: password.to_string(),
            role,
        }),
        _ => Err(v.into_errors()),
    }
}

/// 利用者保存の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserSave {
    /// 新規登録した
    Created(User, UserCreated),
    /// 既存の利用者を更新した（`requested_new`は「新規」指定だったか）
    Updated {
        user: User,
        event: UserUpdated,
        requested_new: bool,
    },
    /// 「既存」指定だが見つからなかった
    NotFound,
}

/// 純粋関数：利用者を保存する（名前によるupsert）
///
/// ビジネスルール：
/// - 新規指定で同名がいればパスワードと役割を更新する
/// - 既存指定で見つからなければ何もしない
pub fn save_user(existing: Option<&User>, form: UserForm) -> UserSave {
    match (form.kind, existing) {
        (RecordKind::New, None) => {
            let user = User {
                name: form.name,
                password: form.password,
                role: form.role,
            };
            let event = UserCreated {
                name: user.name.clone(),
                role: user.role,
            };
            UserSave::Created(user, event)
        }
        (kind, Some(current)) => {
            let user = User {
                password: form.password,
                role: form.role,
                ..current.clone()
            };
            let event = UserUpdated {
                name: user.name.clone(),
                role: user.role,
            };
            UserSave::Updated {
                user,
                event,
                requested_new: kind == RecordKind::New,
            }
        }
        (RecordKind::Existing, None) => UserSave::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn save_cmd(kind: &str, name: &str, password: &str, role: &str) -> SaveUser {
        SaveUser {
            kind: Some(kind.to_string()),
            name: name.to_string(),
            password: password.to_string(),
            role: Some(role.to_string()),
        }
    }

    // TDD: login() のテスト
    #[test]
    fn test_login_requires_name_and_password() {
        let errors = login(&Login {
            name: " ".to_string(),
            password: String::new(),
            role: None,
        })
        .unwrap_err();

        assert_eq!(errors.message_for(Field::LoginName), Some("Name is required"));
        assert_eq!(
            errors.message_for(Field::LoginPassword),
            Some("Password is required")
        );
    }

    #[test]
    fn test_login_defaults_to_member_role() {
        let (session, _) = login(&Login {
            name: "ravi".to_string(),
            password: "secret".to_string(),
            role: None,
        })
        .unwrap();
        assert_eq!(session.role, Role::Member);
        assert_eq!(session.welcome(), "Welcome ravi (MEMBER)");
    }

    #[test]
    fn test_login_as_admin() {
        let (session, event) = login(&Login {
            name: "meera".to_string(),
            password: "pw".to_string(),
            role: Some("admin".to_string()),
        })
        .unwrap();
        assert!(session.role.is_admin());
        assert_eq!(event.name, "meera");
    }

    // TDD: save_user() のテスト
    #[test]
    fn test_save_new_user() {
        let form = validate_user_form(&save_cmd("new", "ravi", "pw", "member")).unwrap();
        match save_user(None, form) {
            UserSave::Created(user, event) => {
                assert_eq!(user.name, "ravi");
                assert_eq!(event.role, Role::Member);
            }
            other => panic!("expected Created, got {:?}", other),
        }
    }

    #[test]
    fn test_save_new_user_with_taken_name_updates_password() {
        let current = User {
            name: "ravi".to_string(),
            password: "old".to_string(),
            role: Role::Member,
        };
        let form = validate_user_form(&save_cmd("new", "ravi", "new-pw", "admin")).unwrap();
        match save_user(Some(&current), form) {
            UserSave::Updated {
                user,
                requested_new,
                ..
            } => {
                assert!(requested_new);
                assert_eq!(user.password, "new-pw");
                assert_eq!(user.role, Role::Admin);
            }
            other => panic!("expected Updated, got {:?}", other),
        }
    }

    #[test]
    fn test_save_existing_user_not_found() {
        let form = validate_user_form(&save_cmd("existing", "ghost", "pw", "member")).unwrap();
        assert_eq!(save_user(None, form), UserSave::NotFound);
    }

    #[test]
    fn test_validate_user_form_requires_fields() {
        let errors = validate_user_form(&SaveUser {
            kind: None,
            name: String::new(),
            password: String::new(),
            role: None,
        })
        .unwrap_err();

        assert_eq!(errors.message_for(Field::UserKind), Some("Select new or existing"));
        assert_eq!(errors.message_for(Field::UserName), Some("Name required"));
        assert_eq!(errors.message_for(Field::UserPassword), Some("Password required"));
        assert_eq!(errors.message_for(Field::UserRole), Some("Select role"));
    }

    #[test]
    fn test_password_is_not_serialized() {
        let user = User {
            name: "ravi".to_string(),
            password: "secret".to_string(),
            role: Role::Member,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
    }
}
