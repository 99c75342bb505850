use crate::{AppState, Effect, JobId, Msg, PageInfo, ProjectKind, Stage};

/// Pure update function: applies a message to state and returns any effects.
///
/// Jobs run strictly one after another: every step of a job finishes before
/// the next URL is fetched. A failed step ends its job; the batch carries on.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UrlsSubmitted(urls) => {
            let urls = urls
                .into_iter()
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty());
            let enqueued = state.enqueue_urls(urls);
            if enqueued == 0 || state.active_job().is_some() {
                Vec::new()
            } else {
                start_next(&mut state)
            }
        }
        Msg::PageFetched { job_id, result } => match result {
            Ok(info) => page_loaded(&mut state, job_id, info),
            Err(reason) => {
                if state.active_job() != Some(job_id) {
                    return (state, Vec::new());
                }
                state.finish(job_id, Some(reason));
                start_next(&mut state)
            }
        },
        Msg::ScaffoldFinished { job_id, result } => {
            if state.active_job() != Some(job_id) {
                return (state, Vec::new());
            }
            match result {
                Err(reason) => complete(&mut state, job_id, Some(reason)),
                Ok(failures) => {
                    add_failures(&mut state, job_id, failures);
                    if state.mode().documents() {
                        set_stage(&mut state, job_id, Stage::Documenting);
                        vec![Effect::WriteReadme { job_id }]
                    } else {
                        complete(&mut state, job_id, None)
                    }
                }
            }
        }
        Msg::ReadmeFinished { job_id, result } => {
            if state.active_job() != Some(job_id) {
                return (state, Vec::new());
            }
            match result {
                Err(reason) => complete(&mut state, job_id, Some(reason)),
                Ok(failures) => {
                    add_failures(&mut state, job_id, failures);
                    complete(&mut state, job_id, None)
                }
            }
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn start_next(state: &mut AppState) -> Vec<Effect> {
    match state.start_next() {
        Some((job_id, url)) => vec![Effect::FetchPage { job_id, url }],
        None => Vec::new(),
    }
}

fn page_loaded(state: &mut AppState, job_id: JobId, info: PageInfo) -> Vec<Effect> {
    let mode = state.mode();
    let Some(job) = state.active_job_mut(job_id) else {
        return Vec::new();
    };
    job.title = info.title;

    if !mode.scaffolds() {
        job.stage = Stage::Documenting;
        state.mark_dirty();
        return vec![Effect::WriteReadme { job_id }];
    }

    let kind = match info.repository.as_deref() {
        None => Err("page names no GitHub repository".to_string()),
        Some(repository) => ProjectKind::from_repository(repository)
            .ok_or_else(|| format!("unknown project type for repository {repository}")),
    };
    match kind {
        Ok(kind) => {
            job.kind = Some(kind);
            job.stage = Stage::Scaffolding;
            state.mark_dirty();
            vec![Effect::Scaffold { job_id, kind }]
        }
        Err(reason) => complete(state, job_id, Some(reason)),
    }
}

fn add_failures(state: &mut AppState, job_id: JobId, failures: usize) {
    if let Some(job) = state.active_job_mut(job_id) {
        job.failures += failures;
    }
}

fn set_stage(state: &mut AppState, job_id: JobId, stage: Stage) {
    if let Some(job) = state.active_job_mut(job_id) {
        job.stage = stage;
    }
    state.mark_dirty();
}

/// Ends the job, releases its page and moves on to the next URL.
fn complete(state: &mut AppState, job_id: JobId, error: Option<String>) -> Vec<Effect> {
    state.finish(job_id, error);
    let mut effects = vec![Effect::ReleasePage { job_id }];
    effects.extend(start_next(state));
    effects
}
