use quill::auth::TokenStore;

const LOGIN_TEMPLATE: &[u8] = b"<form><input name=\"_csrf\" value=\"{{csrf}}\"></form>";

#[test]
fn test_mint_renders_token_into_page() {
    let store = TokenStore::new();

    let (token, rendered) = store.mint(None, LOGIN_TEMPLATE);

    let rendered = String::from_utf8(rendered).unwrap();
    assert!(rendered.contains(&token));
    assert!(!rendered.contains("{{csrf}}"));
}

#[test]
fn test_mint_binds_exact_rendered_bytes() {
    let store = TokenStore::new();

    let (token, rendered) = store.mint(None, LOGIN_TEMPLATE);

    assert_eq!(store.page_for(&token), Some(rendered));
}

#[test]
fn test_mint_replaces_previous_binding() {
    let store = TokenStore::new();

    let (first, _) = store.mint(None, LOGIN_TEMPLATE);
    let (second, _) = store.mint(Some(first.clone()), LOGIN_TEMPLATE);

    assert_ne!(first, second);
    assert_eq!(store.live_tokens(), 1);
    assert!(store.page_for(&first).is_none());
    assert!(store.page_for(&second).is_some());
}

#[test]
fn test_validate_accepts_matching_submission() {
    let store = TokenStore::new();
    let (token, _) = store.mint(None, LOGIN_TEMPLATE);

    let body = format!("usr=user&pwd=pass&_csrf={token}");
    assert!(store.validate(Some(&token), &body));
}

#[test]
fn test_validate_rejects_wrong_token() {
    let store = TokenStore::new();
    let (token, _) = store.mint(None, LOGIN_TEMPLATE);

    assert!(!store.validate(Some(&token), "usr=user&pwd=pass&_csrf=forged"));
}

#[test]
fn test_validate_rejects_missing_field() {
    let store = TokenStore::new();
    let (token, _) = store.mint(None, LOGIN_TEMPLATE);

    assert!(!store.validate(Some(&token), "usr=user&pwd=pass"));
}

#[test]
fn test_validate_rejects_session_without_token() {
    let store = TokenStore::new();

    assert!(!store.validate(None, "_csrf=anything"));
}

#[test]
fn test_validate_rejects_revoked_token() {
    let store = TokenStore::new();
    let (token, _) = store.mint(None, LOGIN_TEMPLATE);

    store.revoke(Some(token.clone()));

    let body = format!("_csrf={token}");
    assert!(!store.validate(Some(&token), &body));
    assert_eq!(store.live_tokens(), 0);
}

#[test]
fn test_render_does_not_bind() {
    let store = TokenStore::new();
    let (token, _) = store.mint(None, LOGIN_TEMPLATE);

    let rendered = store.render(Some(&token), LOGIN_TEMPLATE);

    assert!(String::from_utf8(rendered).unwrap().contains(&token));
    assert_eq!(store.live_tokens(), 1);
}

#[test]
fn test_render_without_token_empties_field() {
    let store = TokenStore::new();

    let rendered = store.render(None, b"value=\"{{csrf}}\"");

    assert_eq!(rendered, b"value=\"\"");
}

#[test]
fn test_tokens_are_unpredictable_length_and_distinct() {
    let store = TokenStore::new();

    let (a, _) = store.mint(None, b"");
    let (b, _) = store.mint(None, b"");

    assert_eq!(a.len(), 32);
    assert_ne!(a, b);
}
