use std::fs;
use std::path::Path;
use apikey_service::{
    database::Database,
    errors::ApiError,
    models::NewUser,
    security::{ApiKeyGenerator, PasswordHasher},
};

fn test_database(name: &str) -> Database {
    let test_db_dir = "tests/test_db";
    if !Path::new(test_db_dir).exists() {
        fs::create_dir_all(test_db_dir).expect("Failed to create test_db directory");
    }

    let db_path = format!("{}/{}.sqlite", test_db_dir, name);
    let _ = fs::remove_file(&db_path);

    Database::new(&db_path).expect("Failed to create test database")
}

fn new_user(email: &str, api_key: &str) -> NewUser {
    NewUser {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: email.to_string(),
        api_key: api_key.to_string(),
    }
}

#[tokio::test]
async fn test_database_api_key_operations() {
    println!("🧪 Testing database API key operations...");

    let db = test_database("test_api_key_ops");
    let generator = ApiKeyGenerator::new("Test");
    let key = generator.generate();

    // APIキー作成テスト
    let key_id = db.create_api_key(&key, "billing").expect("Failed to create API key");
    assert!(key_id > 0);

    // APIキー取得テスト
    let stored = db
        .find_api_key(&key)
        .expect("Failed to query API key")
        .expect("API key should exist");
    assert_eq!(stored.id, key_id);
    assert_eq!(stored.service_name, "billing");
    assert!(!stored.out_of_date);

    assert!(db.api_key_exists(&key).unwrap());
    assert!(!db.api_key_exists("Test-00000000-00000000-00000000-00000000").unwrap());
    assert!(db.find_api_key("unknown").unwrap().is_none());

    let all = db.list_api_keys().expect("Failed to list API keys");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].api_key, key);

    println!("✅ Database API key operations test passed");
}

#[tokio::test]
async fn test_duplicate_api_key_is_rejected() {
    let db = test_database("test_duplicate_key");

    db.create_api_key("Test-DUP", "one").expect("Failed to create API key");
    let result = db.create_api_key("Test-DUP", "two");
    assert!(matches!(result, Err(ApiError::Database(_))));
}

#[tokio::test]
async fn test_unused_keys_exclude_claimed_keys() {
    println!("🧪 Testing unused API key listing...");

    let db = test_database("test_unused_keys");
    db.create_api_key("Test-A", "alpha").unwrap();
    db.create_api_key("Test-B", "beta").unwrap();

    db.create_user(&new_user("ada@example.com", "Test-A"))
        .expect("Failed to create user");

    let unused = db.list_unused_api_keys().expect("Failed to list unused keys");
    assert_eq!(unused.len(), 1);
    assert_eq!(unused[0].api_key, "Test-B");
    assert_eq!(unused[0].service_name, "beta");

    println!("✅ Unused API key listing test passed");
}

#[tokio::test]
async fn test_database_user_operations() {
    println!("🧪 Testing database user operations...");

    let db = test_database("test_user_ops");
    db.create_api_key("Test-USER", "crm").unwrap();

    // ユーザー作成テスト
    let user_id = db
        .create_user(&new_user("ada@example.com", "Test-USER"))
        .expect("Failed to create user");
    assert!(user_id > 0);

    let users = db.list_users().expect("Failed to list users");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, user_id);
    assert_eq!(users[0].email, "ada@example.com");
    assert_eq!(users[0].api_key, "Test-USER");

    // 重複メール
    let duplicate = db.create_user(&new_user("ada@example.com", "Test-USER"));
    assert!(matches!(duplicate, Err(ApiError::EmailExists)));
    assert_eq!(db.list_users().unwrap().len(), 1);

    // 存在しないキー
    let dangling = db.create_user(&new_user("bob@example.com", "Test-MISSING"));
    assert!(matches!(dangling, Err(ApiError::InvalidApiKey)));

    // 削除
    db.delete_user(user_id).expect("Failed to delete user");
    assert!(matches!(db.delete_user(user_id), Err(ApiError::UserNotFound)));
    assert!(db.list_users().unwrap().is_empty());

    println!("✅ Database user operations test passed");
}

#[tokio::test]
async fn test_referenced_key_cannot_be_deleted() {
    println!("🧪 Testing API key deletion rules...");

    let db = test_database("test_key_delete");
    let key_id = db.create_api_key("Test-REF", "erp").unwrap();
    let user_id = db.create_user(&new_user("ref@example.com", "Test-REF")).unwrap();

    assert!(matches!(db.delete_api_key(key_id), Err(ApiError::KeyInUse)));
    assert!(db.api_key_exists("Test-REF").unwrap());

    db.delete_user(user_id).unwrap();
    db.delete_api_key(key_id).expect("Failed to delete API key");
    assert!(!db.api_key_exists("Test-REF").unwrap());
    assert!(matches!(db.delete_api_key(key_id), Err(ApiError::KeyNotFound)));

    println!("✅ API key deletion rules test passed");
}

#[tokio::test]
async fn test_admin_operations() {
    println!("🧪 Testing admin operations...");

    let db = test_database("test_admin_ops");
    let hasher = PasswordHasher::new(4);

    let hash = hasher.hash("hunter2").expect("Failed to hash password");
    let admin_id = db.create_admin("root@example.com", &hash).expect("Failed to create admin");
    assert!(admin_id > 0);

    let duplicate = db.create_admin("root@example.com", &hash);
    assert!(matches!(duplicate, Err(ApiError::AdminExists)));

    let stored = db
        .find_admin_password("root@example.com")
        .unwrap()
        .expect("Admin should exist");
    assert_ne!(stored, "hunter2");
    assert!(hasher.verify("hunter2", &stored).unwrap());
    assert!(!hasher.verify("hunter3", &stored).unwrap());

    assert!(db.find_admin_password("nobody@example.com").unwrap().is_none());

    println!("✅ Admin operations test passed");
}
