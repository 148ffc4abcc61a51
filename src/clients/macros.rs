macro_rules! impl_client_new {
    ($client_name:ident, $entity:ty) => {
        impl $client_name {
            pub fn new(inner: crate::framework::ResourceClient<$entity>) -> Self {
                Self { inner }
            }
        }
    };
}

/// Generates `get_<entity>`, `list_<entity>s` and `delete_<entity>` on a client that
/// wraps a [`ResourceClient`](crate::framework::ResourceClient) in `inner`.
macro_rules! impl_client_methods {
    ($client_name:ident, $entity:ty, $error:ty, $entity_name_snake:ident) => {
        paste::paste! {
            #[allow(dead_code)]
            impl $client_name {
                #[tracing::instrument(skip(self))]
                pub async fn [<get_ $entity_name_snake>](&self, id: String) -> Result<Option<$entity>, $error> {
                    tracing::debug!("Sending request");
                    self.inner.get(id).await.map_err(<$error>::from)
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<list_ $entity_name_snake s>](&self) -> Result<Vec<$entity>, $error> {
                    tracing::debug!("Sending request");
                    self.inner.list().await.map_err(<$error>::from)
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<delete_ $entity_name_snake>](&self, id: String) -> Result<$entity, $error> {
                    tracing::debug!("Sending request");
                    self.inner.delete(id).await.map_err(<$error>::from)
                }
            }
        }
    };
}

macro_rules! impl_basic_client {
    ($client_name:ident, $entity:ty, $error:ty, $entity_name_snake:ident) => {
        impl_client_new!($client_name, $entity);
        impl_client_methods!($client_name, $entity, $error, $entity_name_snake);
    };
}

/// Request/response method for clients of hand-written actors whose request enum
/// variants carry the parameters plus a `respond_to` oneshot.
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident, Error = $error_type:ty) => {
        impl $client {
            #[tracing::instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, $error_type> {
                tracing::debug!("Sending request");
                let (respond_to, response) = tokio::sync::oneshot::channel();
                self.sender.send($request::$variant {
                    $($param,)*
                    respond_to,
                }).await.map_err(|_| <$error_type>::ActorCommunicationError("Actor closed".to_string()))?;

                response.await.map_err(|_| <$error_type>::ActorCommunicationError("Actor dropped".to_string()))?
            }
        }
    };
}
