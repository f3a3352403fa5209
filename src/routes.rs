use crate::{
    api::{admins, attendance, dashboard, devices, employees, leaves, reports, sync, system},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/dashboard")
                    .service(web::resource("").route(web::get().to(dashboard::dashboard_summary))),
            )
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employees::create_employee))
                            .route(web::get().to(employees::list_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(employees::update_employee))
                            .route(web::get().to(employees::get_employee))
                            .route(web::delete().to(employees::delete_employee)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    .service(web::resource("").route(web::get().to(attendance::list_attendance))),
            )
            .service(
                web::scope("/devices")
                    // /devices/test before /devices/{id} so "test" never parses as an id
                    .service(web::resource("/test").route(web::post().to(devices::test_device)))
                    .service(
                        web::resource("")
                            .route(web::get().to(devices::list_devices))
                            .route(web::post().to(devices::create_device)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(devices::update_device))
                            .route(web::delete().to(devices::delete_device)),
                    ),
            )
            .service(
                web::scope("/sync")
                    .service(
                        web::resource("/employees").route(web::post().to(sync::sync_employees)),
                    )
                    .service(
                        web::resource("/attendance").route(web::post().to(sync::sync_attendance)),
                    ),
            )
            .service(
                web::scope("/leaves")
                    // /leaves
                    .service(
                        web::resource("")
                            .route(web::get().to(leaves::leave_list))
                            .route(web::post().to(leaves::create_leave)),
                    )
                    // /leaves/{id}
                    .service(web::resource("/{id}").route(web::get().to(leaves::get_leave)))
                    // /leaves/{id}/approve
                    .service(
                        web::resource("/{id}/approve").route(web::put().to(leaves::approve_leave)),
                    )
                    // /leaves/{id}/reject
                    .service(
                        web::resource("/{id}/reject").route(web::put().to(leaves::reject_leave)),
                    ),
            )
            .service(
                web::scope("/reports").service(
                    web::resource("/attendance").route(web::get().to(reports::attendance_report)),
                ),
            )
            .service(
                web::scope("/admins")
                    .service(
                        web::resource("")
                            .route(web::get().to(admins::list_admins))
                            .route(web::post().to(admins::create_admin)),
                    )
                    .service(
                        web::resource("/{id}").route(web::delete().to(admins::delete_admin)),
                    ),
            )
            .service(
                web::scope("/system").service(
                    web::resource("/database").route(web::get().to(system::database_stats)),
                ),
            ),
    );
}

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days)

// API REQUEST
//  └─ Authorization: Bearer access_token
