//! SPA Edge는 정적 웹사이트 오리진 앞에서 응답 헤더를 재작성하는 엣지 함수와
//! 이를 로컬에서 실행하는 엣지 호스트입니다.
//!
//! # 주요 기능
//!
//! - 모든 응답에 `cfn: 1` 표식 추가
//! - 302 응답의 `Location`을 뷰어 호스트(`https://{host}/`)로 재작성
//! - 공유 비밀 헤더를 붙여 오리진에 요청하는 단일 오리진 엣지 호스트
//! - 이벤트 문서(JSON)로 함수를 시험 실행
//!
//! # 예제
//!
//! ```
//! use spa_edge::function::{HeaderEntry, RequestView, ResponseHeaderRewriter, ResponseView};
//!
//! let mut request = RequestView::default();
//! request.headers.insert("host".to_string(), HeaderEntry::new("cdn.example"));
//!
//! let response = ResponseView::new(302)
//!     .with_header("location", "http://bucket.s3-website-region.amazonaws.com/");
//!
//! let response = ResponseHeaderRewriter::new().rewrite(&request, response).unwrap();
//! assert_eq!(response.header("location"), Some("https://cdn.example/"));
//! assert_eq!(response.header("cfn"), Some("1"));
//! ```

pub mod distribution;
pub mod edge;
pub mod function;
pub mod logging;
pub mod settings;
pub mod tls;
