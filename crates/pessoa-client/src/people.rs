//! Person endpoints.
//!
//! | Method   | Path |
//! |----------|------|
//! | `GET`    | `/api/v1/people/get-all` |
//! | `POST`   | `/api/v1/people/create` |
//! | `POST`   | `/api/v2/people/create` |
//! | `PUT`    | `/api/v1/people/update/{id}` |
//! | `DELETE` | `/api/v1/people/delete/{id}` |
//! | `GET`    | `/api/v1/people/get-by-id/{id}` |
//! | `GET`    | `/api/v1/people/get-by-cpf/{cpf}` |

use pessoa_core::{
  Result,
  person::{NewPerson, Person, PersonId, PersonPatch, SchemaVariant},
  remote::PersonRemote,
};

use reqwest::Method;

use crate::ApiClient;

fn create_path(variant: SchemaVariant) -> &'static str {
  match variant {
    SchemaVariant::V1 => "/api/v1/people/create",
    SchemaVariant::V2 => "/api/v2/people/create",
  }
}

impl PersonRemote for ApiClient {
  async fn list_all(&self) -> Result<Vec<Person>> {
    self.fetch(self.request(Method::GET, "/api/v1/people/get-all")).await
  }

  async fn create<'a>(&'a self, variant: SchemaVariant, data: &'a NewPerson) -> Result<Person> {
    let body = data.for_variant(variant);
    self.fetch(self.request(Method::POST, create_path(variant)).json(&body)).await
  }

  async fn update<'a>(&'a self, id: PersonId, patch: &'a PersonPatch) -> Result<Person> {
    let path = format!("/api/v1/people/update/{id}");
    self.fetch(self.request(Method::PUT, &path).json(patch)).await
  }

  async fn delete(&self, id: PersonId) -> Result<()> {
    let path = format!("/api/v1/people/delete/{id}");
    self.execute(self.request(Method::DELETE, &path)).await
  }

  async fn get_by_id(&self, id: PersonId) -> Result<Person> {
    let path = format!("/api/v1/people/get-by-id/{id}");
    self.fetch(self.request(Method::GET, &path)).await
  }

  async fn get_by_cpf<'a>(&'a self, cpf: &'a str) -> Result<()> {
    let req = self.request_with_segment(Method::GET, "/api/v1/people/get-by-cpf", cpf)?;
    self.execute(req).await
  }
}
