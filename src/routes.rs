use crate::api::{employee, leave_request, leave_type, organization};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

/// Per-peer limiter allowing `requests_per_min` with an equal burst.
pub fn build_limiter(
    requests_per_min: u32,
) -> anyhow::Result<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow::anyhow!("invalid rate limit: {} per minute", requests_per_min))?;
    Ok(Governor::new(&cfg))
}

pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str) {
    cfg.service(
        web::scope(api_prefix)
            .service(
                web::scope("/departments").service(
                    web::resource("")
                        .route(web::post().to(organization::create_department))
                        .route(web::get().to(organization::list_departments)),
                ),
            )
            .service(
                web::scope("/jobs")
                    // /jobs
                    .service(
                        web::resource("")
                            .route(web::post().to(organization::create_job))
                            .route(web::get().to(organization::list_jobs)),
                    )
                    // /jobs/{id}
                    .service(web::resource("/{id}").route(web::get().to(organization::get_job)))
                    .service(
                        web::resource("/{id}/active")
                            .route(web::put().to(organization::set_job_active)),
                    )
                    .service(
                        web::resource("/{id}/current-employees")
                            .route(web::get().to(organization::job_current_employees)),
                    )
                    .service(
                        web::resource("/{id}/assignment-history")
                            .route(web::get().to(organization::job_assignment_history)),
                    ),
            )
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee)),
                    )
                    .service(
                        web::resource("/{id}/assign").route(web::post().to(employee::assign_job)),
                    )
                    .service(
                        web::resource("/{id}/transfer")
                            .route(web::post().to(employee::transfer_employee)),
                    )
                    .service(
                        web::resource("/{id}/terminate")
                            .route(web::post().to(employee::terminate_employee)),
                    )
                    .service(
                        web::resource("/{id}/job-history")
                            .route(web::get().to(employee::job_history)),
                    )
                    .service(
                        web::resource("/{id}/current-assignment")
                            .route(web::get().to(employee::current_assignment)),
                    )
                    .service(
                        web::resource("/{id}/leave-balance")
                            .route(web::get().to(employee::leave_balance)),
                    ),
            )
            .service(
                web::scope("/leave-types")
                    .service(
                        web::resource("")
                            .route(web::post().to(leave_type::create_leave_type))
                            .route(web::get().to(leave_type::list_leave_types)),
                    )
                    .service(
                        web::resource("/{id}").route(web::get().to(leave_type::get_leave_type)),
                    )
                    .service(
                        web::resource("/{id}/active")
                            .route(web::put().to(leave_type::set_leave_type_active)),
                    ),
            )
            .service(
                web::scope("/leaves")
                    // /leaves
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    // before /{id} so "check" is not taken as an id
                    .service(
                        web::resource("/check").route(web::post().to(leave_request::check_leave)),
                    )
                    // /leaves/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(leave_request::get_leave))
                            .route(web::put().to(leave_request::reschedule_leave)),
                    )
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(leave_request::approve_leave)),
                    )
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(leave_request::reject_leave)),
                    )
                    .service(
                        web::resource("/{id}/cancel")
                            .route(web::put().to(leave_request::cancel_leave)),
                    ),
            ),
    );
}
