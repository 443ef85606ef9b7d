//! An in-process stand-in for the Todo API, served by actix-web on a random local port.
#![allow(dead_code)]

use actix_web::dev::{Service, ServerHandle};
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use chrono::{DateTime, SubsecRound, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use todo_client::models::{CreateTaskRequest, Task, UpdateTaskRequest};
use uuid::Uuid;

struct StoredUser {
    id: i64,
    email: String,
    name: String,
    password: String,
}

#[derive(Default)]
pub struct Backend {
    users: Mutex<Vec<StoredUser>>,
    /// token -> user id
    tokens: Mutex<HashMap<String, i64>>,
    tasks: Mutex<Vec<Task>>,
    requests: Mutex<Vec<String>>,
    /// Make `GET /auth/me` answer 500.
    pub me_fails: AtomicBool,
    /// Make `POST /auth/logout` answer 500.
    pub logout_fails: AtomicBool,
}

impl Backend {
    fn record(&self, line: String) {
        self.requests.lock().unwrap().push(line);
    }

    /// "METHOD /path" for every request received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Drops every issued token, as if the server restarted with a new secret.
    pub fn revoke_all_tokens(&self) {
        self.tokens.lock().unwrap().clear();
    }

    pub fn fail_me(&self, fail: bool) {
        self.me_fails.store(fail, Ordering::SeqCst);
    }

    pub fn fail_logout(&self, fail: bool) {
        self.logout_fails.store(fail, Ordering::SeqCst);
    }

    fn issue_token(&self, user_id: i64) -> String {
        let token = format!("token-{}", Uuid::new_v4());
        self.tokens.lock().unwrap().insert(token.clone(), user_id);
        token
    }

    fn user_for(&self, req: &HttpRequest) -> Option<i64> {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))?;
        self.tokens.lock().unwrap().get(token).copied()
    }

    /// The caller must hold a valid token for the user named in the path.
    fn authorize(&self, req: &HttpRequest, path_user: &str) -> Result<(), HttpResponse> {
        match self.user_for(req) {
            Some(id) if id.to_string() == path_user => Ok(()),
            _ => Err(HttpResponse::Unauthorized().json(json!({ "detail": "Not authenticated" }))),
        }
    }
}

pub struct StubServer {
    pub base_url: String,
    pub backend: Arc<Backend>,
    handle: ServerHandle,
}

impl StubServer {
    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

/// Microsecond precision, like the Python datetimes the real backend stores.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Offset-free ISO-8601, the way a naive backend datetime goes over the wire.
fn naive(ts: &DateTime<Utc>) -> String {
    ts.naive_utc().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Hand-built task body with numeric ids and naive timestamps.
fn wire_task(task: &Task) -> Value {
    json!({
        "id": task.id,
        "title": task.title,
        "description": task.description,
        "status": task.status,
        "created_at": naive(&task.created_at),
        "completed_at": task.completed_at.as_ref().map(naive),
        "updated_at": task.updated_at.as_ref().map(naive),
        "user_id": task.user_id.parse::<i64>().unwrap_or_default()
    })
}

#[derive(Deserialize)]
struct RegisterBody {
    email: String,
    password: String,
    name: String,
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn register(backend: web::Data<Backend>, body: web::Json<RegisterBody>) -> HttpResponse {
    let body = body.into_inner();
    let id = {
        let mut users = backend.users.lock().unwrap();
        if users.iter().any(|u| u.email == body.email) {
            return HttpResponse::BadRequest().json(json!({ "detail": "Email already registered" }));
        }
        let id = users.len() as i64 + 1;
        users.push(StoredUser {
            id,
            email: body.email,
            name: body.name,
            password: body.password,
        });
        id
    };
    let token = backend.issue_token(id);
    HttpResponse::Created().json(json!({
        "access_token": token,
        "token_type": "bearer",
        "user_id": id
    }))
}

async fn login(backend: web::Data<Backend>, body: web::Json<LoginBody>) -> HttpResponse {
    let id = backend
        .users
        .lock()
        .unwrap()
        .iter()
        .find(|u| u.email == body.email && u.password == body.password)
        .map(|u| u.id);
    match id {
        Some(id) => {
            let token = backend.issue_token(id);
            HttpResponse::Ok().json(json!({
                "access_token": token,
                "token_type": "bearer",
                "user_id": id
            }))
        }
        None => HttpResponse::Unauthorized().json(json!({ "detail": "Invalid credentials" })),
    }
}

async fn logout(backend: web::Data<Backend>, req: HttpRequest) -> HttpResponse {
    if backend.logout_fails.load(Ordering::SeqCst) {
        return HttpResponse::InternalServerError().finish();
    }
    if backend.user_for(&req).is_none() {
        return HttpResponse::Unauthorized().finish();
    }
    HttpResponse::Ok().json(json!({ "message": "Logged out" }))
}

async fn me(backend: web::Data<Backend>, req: HttpRequest) -> HttpResponse {
    if backend.me_fails.load(Ordering::SeqCst) {
        return HttpResponse::InternalServerError().finish();
    }
    let Some(id) = backend.user_for(&req) else {
        return HttpResponse::Unauthorized().finish();
    };
    let users = backend.users.lock().unwrap();
    match users.iter().find(|u| u.id == id) {
        Some(u) => HttpResponse::Ok().json(json!({ "id": u.id, "email": u.email, "name": u.name })),
        None => HttpResponse::NotFound().finish(),
    }
}

async fn list_tasks(
    backend: web::Data<Backend>,
    req: HttpRequest,
    path: web::Path<String>,
) -> HttpResponse {
    let user_id = path.into_inner();
    if let Err(resp) = backend.authorize(&req, &user_id) {
        return resp;
    }
    let tasks: Vec<Value> = backend
        .tasks
        .lock()
        .unwrap()
        .iter()
        .filter(|t| t.user_id == user_id)
        .map(wire_task)
        .collect();
    HttpResponse::Ok().json(json!({ "tasks": tasks, "total": tasks.len() }))
}

async fn create_task(
    backend: web::Data<Backend>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<CreateTaskRequest>,
) -> HttpResponse {
    let user_id = path.into_inner();
    if let Err(resp) = backend.authorize(&req, &user_id) {
        return resp;
    }
    let task = Task::new(
        Uuid::new_v4().to_string(),
        body.into_inner(),
        &user_id,
        now(),
    );
    backend.tasks.lock().unwrap().insert(0, task.clone());
    HttpResponse::Created().json(task)
}

/// Runs `f` on the caller's task with the given id, or answers 404.
fn with_task<F>(backend: &Backend, user_id: &str, id: &str, f: F) -> HttpResponse
where
    F: FnOnce(&mut Task) -> HttpResponse,
{
    let mut tasks = backend.tasks.lock().unwrap();
    match tasks.iter_mut().find(|t| t.id == id && t.user_id == user_id) {
        Some(task) => f(task),
        None => HttpResponse::NotFound().json(json!({ "detail": "Task not found" })),
    }
}

async fn get_task(
    backend: web::Data<Backend>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (user_id, id) = path.into_inner();
    if let Err(resp) = backend.authorize(&req, &user_id) {
        return resp;
    }
    with_task(&backend, &user_id, &id, |task| HttpResponse::Ok().json(wire_task(task)))
}

async fn update_task(
    backend: web::Data<Backend>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
    body: web::Json<UpdateTaskRequest>,
) -> HttpResponse {
    let (user_id, id) = path.into_inner();
    if let Err(resp) = backend.authorize(&req, &user_id) {
        return resp;
    }
    let update = body.into_inner();
    with_task(&backend, &user_id, &id, move |task| {
        task.apply(update, now());
        HttpResponse::Ok().json(&*task)
    })
}

async fn delete_task(
    backend: web::Data<Backend>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (user_id, id) = path.into_inner();
    if let Err(resp) = backend.authorize(&req, &user_id) {
        return resp;
    }
    let mut tasks = backend.tasks.lock().unwrap();
    let before = tasks.len();
    tasks.retain(|t| !(t.id == id && t.user_id == user_id));
    if tasks.len() == before {
        HttpResponse::NotFound().json(json!({ "detail": "Task not found" }))
    } else {
        HttpResponse::NoContent().finish()
    }
}

async fn complete_task(
    backend: web::Data<Backend>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (user_id, id) = path.into_inner();
    if let Err(resp) = backend.authorize(&req, &user_id) {
        return resp;
    }
    with_task(&backend, &user_id, &id, |task| {
        task.toggle(now());
        HttpResponse::Ok().json(&*task)
    })
}

/// Binds a random port and serves the stub API until `stop` is called.
pub async fn start() -> StubServer {
    let backend = Arc::new(Backend::default());
    let data = web::Data::from(backend.clone());
    let recorder = backend.clone();

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let server = HttpServer::new(move || {
        let recorder = recorder.clone();
        App::new()
            .app_data(data.clone())
            .wrap_fn(move |req, srv| {
                recorder.record(format!("{} {}", req.method(), req.path()));
                srv.call(req)
            })
            .route("/auth/register", web::post().to(register))
            .route("/auth/login", web::post().to(login))
            .route("/auth/logout", web::post().to(logout))
            .route("/auth/me", web::get().to(me))
            .route("/api/{user_id}/tasks", web::get().to(list_tasks))
            .route("/api/{user_id}/tasks", web::post().to(create_task))
            .route("/api/{user_id}/tasks/{id}", web::get().to(get_task))
            .route("/api/{user_id}/tasks/{id}", web::patch().to(update_task))
            .route("/api/{user_id}/tasks/{id}", web::delete().to(delete_task))
            .route(
                "/api/{user_id}/tasks/{id}/complete",
                web::post().to(complete_task),
            )
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to listen on stub port")
    .run();

    let handle = server.handle();
    actix_rt::spawn(server);

    StubServer {
        base_url: format!("http://127.0.0.1:{}", port),
        backend,
        handle,
    }
}
