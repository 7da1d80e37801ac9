use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::{A, AAAA, CNAME};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::str::FromStr;

pub fn query_for(domain: &str, id: u16) -> Message {
    let mut query = Query::new();
    query.set_name(Name::from_str(domain).unwrap());
    query.set_query_type(RecordType::A);

    let mut message = Message::new(id, MessageType::Query, OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(query);
    message
}

pub fn response_with(request: &Message, answers: Vec<Record>) -> Message {
    let mut response = Message::new(request.id(), MessageType::Response, OpCode::Query);
    response.set_recursion_desired(true);
    response.set_recursion_available(true);
    for query in request.queries() {
        response.add_query(query.clone());
    }
    for answer in answers {
        response.add_answer(answer);
    }
    response
}

pub fn a_record(name: &str, ip: &str) -> Record {
    Record::from_rdata(
        Name::from_str(name).unwrap(),
        300,
        RData::A(A(ip.parse().unwrap())),
    )
}

pub fn aaaa_record(name: &str, ip: &str) -> Record {
    Record::from_rdata(
        Name::from_str(name).unwrap(),
        300,
        RData::AAAA(AAAA(ip.parse().unwrap())),
    )
}

pub fn cname_record(name: &str, target: &str) -> Record {
    Record::from_rdata(
        Name::from_str(name).unwrap(),
        300,
        RData::CNAME(CNAME(Name::from_str(target).unwrap())),
    )
}
