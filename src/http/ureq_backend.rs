use std::time::Duration;

use ureq;

use super::{Error, Response};

/// One agent is built at startup and shared by the resolver and the
/// updater, so every request carries the same timeout and User-Agent.
pub struct Client {
    agent: ureq::Agent,
}

impl Client {
    pub fn new(timeout: Duration, user_agent: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(user_agent)
            .build();

        Self { agent }
    }

    pub fn get(&self, url: &str) -> Result<Response, Error> {
        convert(self.agent.get(url).call())
    }

    pub fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<Response, Error> {
        convert(self.agent.post(url).send_form(form))
    }
}

fn convert(result: Result<ureq::Response, ureq::Error>) -> Result<Response, Error> {
    result
        .map_err(|e| match e {
            ureq::Error::Status(code, resp) => Error::Status(
                code,
                Response {
                    reader: resp.into_reader(),
                },
            ),
            ureq::Error::Transport(tp) => Error::Transport(tp.to_string().into()),
        })
        .map(|resp| Response {
            reader: resp.into_reader(),
        })
}
