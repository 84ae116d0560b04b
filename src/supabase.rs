use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

use serde::{Deserialize, Serialize};

use crate::types::{
    AuthSession, AuthUser, Exercise, NewSet, NewTarget, Profile, SetPatch, SetRow, TargetRow,
    Workout,
};
use crate::units::Units;

const SUPABASE_URL: &str = "https://qlmxbetkcyispujktuap.supabase.co";
const SUPABASE_KEY: &str = "sb_publishable_Jx4kPa-Vb2m9qQdLmH3R1A_Fw8tNnUe";
const AUTH_SESSION_KEY: &str = "lyftlogg_auth_session";

// ============ AUTH ============

#[derive(Deserialize, Debug)]
struct SupabaseAuthResponse {
    access_token: String,
    user: SupabaseUser,
}

#[derive(Deserialize, Debug)]
struct SupabaseUser {
    id: String,
    email: String,
}

#[derive(Deserialize, Debug)]
struct SupabaseError {
    error: Option<String>,
    error_description: Option<String>,
    msg: Option<String>,
}

async fn auth_request(
    method: &str,
    url: &str,
    body: String,
    bearer: Option<&str>,
) -> Result<JsValue, String> {
    let window = web_sys::window().ok_or("no window")?;

    let headers = Headers::new().map_err(|_| "Failed to create headers")?;
    headers.set("apikey", SUPABASE_KEY).map_err(|_| "Failed to set apikey")?;
    headers
        .set("Content-Type", "application/json")
        .map_err(|_| "Failed to set content-type")?;
    if let Some(token) = bearer {
        headers
            .set("Authorization", &format!("Bearer {}", token))
            .map_err(|_| "Failed to set authorization")?;
    }

    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(&body));
    opts.set_headers(&JsValue::from(&headers));

    let request =
        Request::new_with_str_and_init(url, &opts).map_err(|_| "Failed to create request")?;

    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|_| "Fetch failed")?;
    let resp: Response = resp_value.dyn_into().map_err(|_| "Invalid response")?;

    let json = JsFuture::from(resp.json().map_err(|_| "No JSON")?)
        .await
        .map_err(|_| "JSON parse failed")?;

    if !resp.ok() {
        let err: SupabaseError = serde_wasm_bindgen::from_value(json).unwrap_or(SupabaseError {
            error: Some("Unknown error".into()),
            error_description: None,
            msg: None,
        });
        return Err(err
            .error_description
            .or(err.msg)
            .or(err.error)
            .unwrap_or("Request failed".into()));
    }

    Ok(json)
}

fn session_from_response(json: JsValue) -> Result<AuthSession, String> {
    let auth_resp: SupabaseAuthResponse =
        serde_wasm_bindgen::from_value(json).map_err(|_| "Invalid auth response")?;

    let session = AuthSession {
        access_token: auth_resp.access_token,
        user: AuthUser {
            id: auth_resp.user.id,
            email: auth_resp.user.email,
        },
    };

    save_auth_session(&session);
    Ok(session)
}

/// Sign up with email and password
pub async fn sign_up(email: &str, password: &str) -> Result<AuthSession, String> {
    let body = serde_json::json!({
        "email": email,
        "password": password
    })
    .to_string();

    let url = format!("{}/auth/v1/signup", SUPABASE_URL);
    let json = auth_request("POST", &url, body, None).await?;
    session_from_response(json)
}

/// Sign in with email and password
pub async fn sign_in(email: &str, password: &str) -> Result<AuthSession, String> {
    let body = serde_json::json!({
        "email": email,
        "password": password
    })
    .to_string();

    let url = format!("{}/auth/v1/token?grant_type=password", SUPABASE_URL);
    let json = auth_request("POST", &url, body, None).await?;
    session_from_response(json)
}

/// Request a password-reset email. The link in the mail deep-links back
/// into the reset-password view with a recovery token in the fragment.
pub async fn request_password_reset(email: &str) -> Result<(), String> {
    let body = serde_json::json!({ "email": email }).to_string();
    let url = format!("{}/auth/v1/recover", SUPABASE_URL);
    auth_request("POST", &url, body, None).await?;
    Ok(())
}

/// Set a new password for the recovery (or current) session.
pub async fn update_password(access_token: &str, new_password: &str) -> Result<(), String> {
    let body = serde_json::json!({ "password": new_password }).to_string();
    let url = format!("{}/auth/v1/user", SUPABASE_URL);
    auth_request("PUT", &url, body, Some(access_token)).await?;
    Ok(())
}

/// Sign out
pub fn sign_out() {
    if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok()).flatten() {
        let _ = storage.remove_item(AUTH_SESSION_KEY);
    }
}

/// Save auth session to localStorage
pub fn save_auth_session(session: &AuthSession) {
    if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok()).flatten() {
        if let Ok(json) = serde_json::to_string(session) {
            let _ = storage.set_item(AUTH_SESSION_KEY, &json);
        }
    }
}

/// Load auth session from localStorage
pub fn load_auth_session() -> Option<AuthSession> {
    let storage = web_sys::window()?.local_storage().ok()??;
    let json = storage.get_item(AUTH_SESSION_KEY).ok()??;
    serde_json::from_str(&json).ok()
}

/// Get current user ID
pub fn get_current_user_id() -> Option<String> {
    load_auth_session().map(|s| s.user.id)
}

// ============ DATA (PostgREST) ============

fn get_headers() -> Result<Headers, JsValue> {
    let headers = Headers::new()?;
    headers.set("apikey", SUPABASE_KEY)?;

    // Use user's token if logged in, otherwise anon key
    if let Some(session) = load_auth_session() {
        headers.set("Authorization", &format!("Bearer {}", session.access_token))?;
    } else {
        headers.set("Authorization", &format!("Bearer {}", SUPABASE_KEY))?;
    }

    headers.set("Content-Type", "application/json")?;
    Ok(headers)
}

fn create_request_init(method: &str, body: Option<&str>, headers: &Headers) -> RequestInit {
    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);
    if let Some(b) = body {
        opts.set_body(&JsValue::from_str(b));
    }
    opts.set_headers(&JsValue::from(headers));
    opts
}

async fn send(
    method: &str,
    url: &str,
    body: Option<&str>,
    prefer: Option<&str>,
) -> Result<Response, JsValue> {
    let window = web_sys::window().ok_or("no window")?;

    let headers = get_headers()?;
    if let Some(p) = prefer {
        headers.set("Prefer", p)?;
    }
    let opts = create_request_init(method, body, &headers);

    let request = Request::new_with_str_and_init(url, &opts)?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: Response = resp_value.dyn_into()?;

    if !resp.ok() {
        return Err(format!("HTTP error: {}", resp.status()).into());
    }
    Ok(resp)
}

async fn fetch_rows<T: for<'de> Deserialize<'de>>(url: &str) -> Result<Vec<T>, JsValue> {
    let resp = send("GET", url, None, None).await?;
    let json = JsFuture::from(resp.json()?).await?;
    let rows: Vec<T> = serde_wasm_bindgen::from_value(json)?;
    Ok(rows)
}

fn encode(value: &str) -> String {
    js_sys::encode_uri_component(value).into()
}

fn require_user_id() -> Result<String, JsValue> {
    get_current_user_id().ok_or_else(|| JsValue::from_str("not logged in"))
}

// ---- profiles ----

/// The signed-in user's stored unit preference, if any. `Ok(None)` means
/// signed out or no preference; callers fall back to kg either way.
pub async fn fetch_default_units() -> Result<Option<Units>, JsValue> {
    let user_id = match get_current_user_id() {
        Some(id) => id,
        None => return Ok(None),
    };
    let url = format!(
        "{}/rest/v1/profiles?select=default_units&id=eq.{}",
        SUPABASE_URL,
        encode(&user_id)
    );
    let rows: Vec<Profile> = fetch_rows(&url).await?;
    Ok(rows.into_iter().next().and_then(|p| p.default_units))
}

pub async fn fetch_profile() -> Result<Option<Profile>, JsValue> {
    let user_id = require_user_id()?;
    let url = format!(
        "{}/rest/v1/profiles?select=username,default_units&id=eq.{}",
        SUPABASE_URL,
        encode(&user_id)
    );
    let rows: Vec<Profile> = fetch_rows(&url).await?;
    Ok(rows.into_iter().next())
}

#[derive(Serialize)]
struct ProfileUpdate<'a> {
    username: &'a str,
    default_units: Units,
}

pub async fn update_profile(username: &str, units: Units) -> Result<(), JsValue> {
    let user_id = require_user_id()?;
    let body = serde_json::to_string(&ProfileUpdate {
        username,
        default_units: units,
    })
    .map_err(|e| e.to_string())?;
    let url = format!(
        "{}/rest/v1/profiles?id=eq.{}",
        SUPABASE_URL,
        encode(&user_id)
    );
    send("PATCH", &url, Some(&body), None).await?;
    Ok(())
}

// ---- exercises (catalog, read-only) ----

pub async fn fetch_exercises() -> Result<Vec<Exercise>, JsValue> {
    let url = format!(
        "{}/rest/v1/exercises?select=id,name,muscle_group,primary_equipment,movement_pattern&order=name.asc",
        SUPABASE_URL
    );
    fetch_rows(&url).await
}

// ---- workouts ----

/// Looks up the current user's workout at exactly `scheduled_date` (the
/// canonical midnight-UTC string). A clean empty result means "none"; a
/// failed request is an error, not "none".
pub async fn find_workout(scheduled_date: &str) -> Result<Option<Workout>, JsValue> {
    let user_id = require_user_id()?;
    let url = format!(
        "{}/rest/v1/workouts?select=id,user_id,scheduled_date&user_id=eq.{}&scheduled_date=eq.{}",
        SUPABASE_URL,
        encode(&user_id),
        encode(scheduled_date)
    );
    let rows: Vec<Workout> = fetch_rows(&url).await?;
    Ok(rows.into_iter().next())
}

#[derive(Serialize)]
struct NewWorkout<'a> {
    user_id: &'a str,
    scheduled_date: &'a str,
}

pub async fn create_workout(scheduled_date: &str) -> Result<Workout, JsValue> {
    let user_id = require_user_id()?;
    let body = serde_json::to_string(&[NewWorkout {
        user_id: &user_id,
        scheduled_date,
    }])
    .map_err(|e| e.to_string())?;

    let url = format!("{}/rest/v1/workouts", SUPABASE_URL);
    let resp = send("POST", &url, Some(&body), Some("return=representation")).await?;
    let json = JsFuture::from(resp.json()?).await?;
    let rows: Vec<Workout> = serde_wasm_bindgen::from_value(json)?;
    rows.into_iter()
        .next()
        .ok_or_else(|| JsValue::from_str("insert returned no row"))
}

/// Deletes a workout together with its targets and sets. The backend has
/// no cascade the client can lean on, so the related rows go first.
pub async fn delete_workout(workout_id: &str) -> Result<(), JsValue> {
    let id = encode(workout_id);
    let url = format!(
        "{}/rest/v1/workout_exercises?workout_id=eq.{}",
        SUPABASE_URL, id
    );
    send("DELETE", &url, None, None).await?;

    let url = format!("{}/rest/v1/sets?workout_id=eq.{}", SUPABASE_URL, id);
    send("DELETE", &url, None, None).await?;

    let url = format!("{}/rest/v1/workouts?id=eq.{}", SUPABASE_URL, id);
    send("DELETE", &url, None, None).await?;
    Ok(())
}

// ---- workout_exercises (targets) ----

pub async fn fetch_targets(workout_id: &str) -> Result<Vec<TargetRow>, JsValue> {
    let url = format!(
        "{}/rest/v1/workout_exercises?select=exercise_id,target_reps_min,target_reps_max,target_weight,target_rpe,exercises(name)&workout_id=eq.{}",
        SUPABASE_URL,
        encode(workout_id)
    );
    fetch_rows(&url).await
}

pub async fn insert_targets(rows: &[NewTarget]) -> Result<(), JsValue> {
    let body = serde_json::to_string(rows).map_err(|e| e.to_string())?;
    let url = format!("{}/rest/v1/workout_exercises", SUPABASE_URL);
    send("POST", &url, Some(&body), None).await?;
    Ok(())
}

/// Replaces a workout's targets wholesale: delete everything, insert the
/// new rows. Last writer wins. The two steps are not one transaction, so a
/// failure between them leaves the workout with no targets; both steps
/// live here so that window has exactly one home.
pub async fn replace_targets(workout_id: &str, rows: &[NewTarget]) -> Result<(), JsValue> {
    let url = format!(
        "{}/rest/v1/workout_exercises?workout_id=eq.{}",
        SUPABASE_URL,
        encode(workout_id)
    );
    send("DELETE", &url, None, None).await?;
    insert_targets(rows).await
}

// ---- sets ----

pub async fn fetch_sets(workout_id: &str, exercise_id: &str) -> Result<Vec<SetRow>, JsValue> {
    let url = format!(
        "{}/rest/v1/sets?select=id,workout_id,exercise_id,reps,partial_reps,weight_kg,rpe,created_at&workout_id=eq.{}&exercise_id=eq.{}&order=created_at.desc",
        SUPABASE_URL,
        encode(workout_id),
        encode(exercise_id)
    );
    fetch_rows(&url).await
}

pub async fn insert_set(row: &NewSet) -> Result<(), JsValue> {
    let body = serde_json::to_string(&[row]).map_err(|e| e.to_string())?;
    let url = format!("{}/rest/v1/sets", SUPABASE_URL);
    send("POST", &url, Some(&body), None).await?;
    Ok(())
}

pub async fn update_set(set_id: &str, patch: &SetPatch) -> Result<(), JsValue> {
    let body = serde_json::to_string(patch).map_err(|e| e.to_string())?;
    let url = format!("{}/rest/v1/sets?id=eq.{}", SUPABASE_URL, encode(set_id));
    send("PATCH", &url, Some(&body), None).await?;
    Ok(())
}

pub async fn delete_set(set_id: &str) -> Result<(), JsValue> {
    let url = format!("{}/rest/v1/sets?id=eq.{}", SUPABASE_URL, encode(set_id));
    send("DELETE", &url, None, None).await?;
    Ok(())
}
